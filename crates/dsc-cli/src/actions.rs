//! # Actions Subcommand
//!
//! Prints the eligibility table. Without `--state` every state of the kind
//! is listed; without `--role` every role. For transfers the SUSPENDED row
//! is expanded per state attribute unless `--attribute` is given.

use clap::Args;
use dsc_core::{AgreementState, NegotiationState, ProcessKind, Role, StateAttribute, TransferState};
use dsc_state::{eligibility, Eligibility, ProcessView};
use serde::Serialize;

/// Arguments for the actions subcommand.
#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Process kind: negotiation, transfer or agreement.
    pub kind: ProcessKind,

    /// Only this state.
    #[arg(long)]
    pub state: Option<String>,

    /// Only this role.
    #[arg(long)]
    pub role: Option<Role>,

    /// Transfer state attribute (BY_PROVIDER, BY_CONSUMER, ...).
    #[arg(long)]
    pub attribute: Option<String>,

    /// For agreements: the role this connector took in the negotiation.
    #[arg(long)]
    pub negotiation_role: Option<Role>,

    /// Emit JSON instead of a text table.
    #[arg(long)]
    pub json: bool,
}

/// One line of the printed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub kind: ProcessKind,
    pub state: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub eligibility: Eligibility,
}

pub fn run(args: &ActionsArgs) -> anyhow::Result<()> {
    let rows = table(args);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render(&rows));
    }
    Ok(())
}

pub fn table(args: &ActionsArgs) -> Vec<Row> {
    let states = match &args.state {
        Some(state) => vec![state.clone()],
        None => state_names(args.kind),
    };
    let roles: Vec<Role> = args.role.map_or_else(|| Role::ALL.to_vec(), |r| vec![r]);

    let mut rows = Vec::new();
    for state in &states {
        for attribute in attributes(args, state) {
            for &role in &roles {
                let view = ProcessView {
                    kind: args.kind,
                    state,
                    attribute: attribute.as_deref(),
                    negotiation_role: args.negotiation_role,
                };
                rows.push(Row {
                    kind: args.kind,
                    state: state.clone(),
                    role,
                    attribute: attribute.clone(),
                    eligibility: eligibility(&view, role),
                });
            }
        }
    }
    rows
}

fn state_names(kind: ProcessKind) -> Vec<String> {
    match kind {
        ProcessKind::ContractNegotiation => NegotiationState::ALL
            .iter()
            .map(|s| s.name().to_string())
            .collect(),
        ProcessKind::TransferProcess => TransferState::ALL
            .iter()
            .map(|s| s.name().to_string())
            .collect(),
        ProcessKind::Agreement => AgreementState::ALL
            .iter()
            .map(|s| s.name().to_string())
            .collect(),
    }
}

fn attributes(args: &ActionsArgs, state: &str) -> Vec<Option<String>> {
    if args.attribute.is_some() || args.kind != ProcessKind::TransferProcess {
        return vec![args.attribute.clone()];
    }
    if state == TransferState::Suspended.name() {
        vec![
            None,
            Some(StateAttribute::ByProvider.name().to_string()),
            Some(StateAttribute::ByConsumer.name().to_string()),
        ]
    } else {
        vec![None]
    }
}

pub fn render(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        let state = match &row.attribute {
            Some(attribute) => format!("{} ({attribute})", row.state),
            None => row.state.clone(),
        };
        let actions = if !row.eligibility.is_empty() {
            row.eligibility
                .actions
                .iter()
                .map(|a| a.label)
                .collect::<Vec<_>>()
                .join(", ")
        } else if row.eligibility.no_further_actions {
            "No further actions".to_string()
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "{:<20} {:<28} {:<9} {}\n",
            row.kind.name(),
            state,
            row.role.name(),
            actions
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: ProcessKind) -> ActionsArgs {
        ActionsArgs {
            kind,
            state: None,
            role: None,
            attribute: None,
            negotiation_role: None,
            json: false,
        }
    }

    #[test]
    fn full_negotiation_table_covers_every_state_and_role() {
        let rows = table(&args(ProcessKind::ContractNegotiation));
        assert_eq!(rows.len(), NegotiationState::ALL.len() * Role::ALL.len());
    }

    #[test]
    fn suspended_transfer_expands_attributes() {
        let mut a = args(ProcessKind::TransferProcess);
        a.state = Some("SUSPENDED".into());
        a.role = Some(Role::Provider);
        let rows = table(&a);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].attribute.as_deref(), Some("BY_CONSUMER"));
        assert!(rows[2].eligibility.find(dsc_state::ActionKind::Start).is_none());
    }

    #[test]
    fn render_shows_marker_and_labels() {
        let mut a = args(ProcessKind::ContractNegotiation);
        a.state = Some("REQUESTED".into());
        a.role = Some(Role::Provider);
        let text = render(&table(&a));
        assert!(text.contains("Terminate, Counter offer, Agree"));

        a.state = Some("TERMINATED".into());
        assert!(render(&table(&a)).contains("No further actions"));
    }
}

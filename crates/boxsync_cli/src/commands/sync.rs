use std::sync::Arc;

use boxsync::htb::{HtbClient, MachineCategory, QuotaGuard};
use boxsync::notion::NotionClient;
use boxsync::sync::{ReconcileResult, SeedResult, reconcile_rows, seed_category};
use console::Term;

use crate::config::Config;
use crate::progress::ProgressReporter;
use crate::prompt::confirm_flow;

/// Which flows the user selected on the command line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlowSelection {
    pub active: bool,
    pub scheduled: bool,
    pub retired: bool,
    pub update: bool,
    pub assume_yes: bool,
}

/// Run the selected flows in their fixed order: active → scheduled →
/// retired → update.
///
/// The tracker snapshot is fetched once, before the first flow. An explicit
/// "no" at any confirmation gate ends the run without touching the
/// remaining flows.
pub(crate) async fn handle_sync(
    selection: FlowSelection,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let htb_token = config.htb_token().ok_or(
        "No platform token configured. Set BOXSYNC_HTB_TOKEN or [htb] token in the config file.",
    )?;
    let notion_token = config.notion_token().ok_or(
        "No tracker token configured. Set BOXSYNC_NOTION_TOKEN or [notion] token in the config file.",
    )?;
    let database = config.notion_database().ok_or(
        "No tracker database configured. Set BOXSYNC_NOTION_DATABASE or [notion] database in the config file.",
    )?;

    let source = HtbClient::new(&config.htb_url(), &htb_token, Some(QuotaGuard::default()))?;
    let sink = NotionClient::new(&config.notion_url(), &notion_token, &database)?;

    let is_tty = Term::stdout().is_term();
    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let snapshot = sink.list_rows().await?;
    if is_tty {
        println!("{} tracked rows in the database\n", snapshot.len());
    } else {
        tracing::info!(rows = snapshot.len(), "Fetched tracker snapshot");
    }

    let creation_flows = [
        (
            selection.active,
            MachineCategory::Active,
            "Add all currently active machines",
        ),
        (
            selection.scheduled,
            MachineCategory::Unreleased,
            "Add all unreleased machines",
        ),
        (
            selection.retired,
            MachineCategory::Retired,
            "Add all retired machines",
        ),
    ];

    for (selected, category, prompt) in creation_flows {
        if !selected {
            continue;
        }
        if !confirm_flow(prompt, selection.assume_yes) {
            reporter.finish();
            if is_tty {
                println!("Exiting...");
            }
            return Ok(());
        }

        let result = seed_category(&source, &sink, &snapshot, category, Some(&callback)).await?;
        print_seed_result(is_tty, category.label(), &result);
    }

    if selection.update {
        if !confirm_flow(
            "Update tracked rows to reflect platform changes",
            selection.assume_yes,
        ) {
            reporter.finish();
            if is_tty {
                println!("Exiting...");
            }
            return Ok(());
        }

        let result = reconcile_rows(&source, &sink, &snapshot, Some(&callback)).await?;
        print_reconcile_result(is_tty, &result);
    }

    reporter.finish();
    if is_tty {
        println!("\nFinished");
    }
    Ok(())
}

fn print_seed_result(is_tty: bool, category: &str, result: &SeedResult) {
    if is_tty {
        println!(
            "{}: {} created, {} already tracked ({} fetched)",
            category, result.created, result.skipped, result.fetched
        );
    } else {
        tracing::info!(
            category = %category,
            created = result.created,
            skipped = result.skipped,
            fetched = result.fetched,
            "Creation flow complete"
        );
    }
}

fn print_reconcile_result(is_tty: bool, result: &ReconcileResult) {
    if is_tty {
        println!(
            "update: {} rows refreshed ({} active, {} retired, {} unreleased), {} retiring dates set",
            result.processed, result.active, result.retired, result.unreleased,
            result.retiring_patched
        );
        if result.retiring_missing > 0 {
            eprintln!(
                "warning: {} retiring relation(s) pointed at untracked machines",
                result.retiring_missing
            );
        }
    } else {
        tracing::info!(
            processed = result.processed,
            active = result.active,
            retired = result.retired,
            unreleased = result.unreleased,
            retiring_patched = result.retiring_patched,
            retiring_missing = result.retiring_missing,
            "Reconciliation complete"
        );
    }
}

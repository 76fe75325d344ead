//! Interactive confirmation gates.

use console::Term;
use dialoguer::Confirm;

/// Ask the user to confirm a flow before running it.
///
/// Empty input defaults to yes. Returns `false` on an explicit "no", which
/// ends the run. Non-interactive runs (pipes, CI) assume yes, since there is
/// nobody to ask; `--yes` does the same explicitly.
pub(crate) fn confirm_flow(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }

    if !Term::stdout().is_term() {
        tracing::info!(prompt = %prompt, "Non-interactive run, assuming yes");
        return true;
    }

    Confirm::new()
        .with_prompt(format!("{prompt}, continue?"))
        .default(true)
        .interact()
        .unwrap_or(false)
}

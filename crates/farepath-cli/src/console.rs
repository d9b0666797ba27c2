//! Interactive route console.
//!
//! Reads `FROM-TO` lines from stdin and prints the cheapest route. Unknown
//! locations get up to three spelling suggestions. `reload` re-reads the
//! route file and `exit` ends the session.
//!
//! Stdin is blocking, so the loop runs on its own thread and reports how it
//! ended over a channel that the async supervisor selects on.

use farepath_core::{Error, Result};
use farepath_graph::{
    Node, ROUTE_SEPARATOR, RouteGraph, RouteGuard, find_best_route, quick_summary,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;

const PROMPT: &str = "Please enter the route (format FROM-TO): ";
const GREETING: &str = "Type 'exit' to end your CLI session";
const INVALID_FORMAT: &str = "Invalid route format. Use the format FROM-TO.";

/// Minimum `normalized_levenshtein` score for a suggestion.
const SUGGESTION_CUTOFF: f64 = 0.6;
const MAX_SUGGESTIONS: usize = 3;

/// How a console session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The user typed `exit`.
    Exited,
    /// Stdin reached end of file.
    InputClosed,
    /// Reading or writing the terminal failed.
    Failed(String),
}

/// Result of handling one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// End the session.
    Exit,
    /// Print these lines and prompt again.
    Lines(Vec<String>),
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self::Lines(vec![text.into()])
    }
}

// ============================================================================
// Line handling
// ============================================================================

/// Handle one line of console input against the current snapshot.
pub fn handle_line(guard: &RouteGuard, input: &str) -> Reply {
    let input = input.trim();
    if input.eq_ignore_ascii_case("exit") {
        return Reply::Exit;
    }
    if input.eq_ignore_ascii_case("reload") {
        return match guard.reload() {
            Ok(graph) => Reply::line(format!("Reloaded: {}", quick_summary(&graph))),
            Err(e) => Reply::line(format!("Reload failed: {e}")),
        };
    }

    let parts: Vec<&str> = input.split('-').collect();
    let [from, to] = parts.as_slice() else {
        return Reply::line(INVALID_FORMAT);
    };
    let origin = Node::new(*from);
    let destination = Node::new(*to);

    // One snapshot for the membership checks and the search. Only the
    // first unknown endpoint is reported.
    let graph = guard.snapshot();
    for (role, node) in [("Origin", &origin), ("Destination", &destination)] {
        if !graph.contains_node(node.as_str()) {
            let mut lines = vec![format!("{role} '{node}' not found.")];
            let similar = suggestions(&graph, node.as_str());
            if !similar.is_empty() {
                lines.push(format!("Did you mean: {}?", similar.join(", ")));
            }
            return Reply::Lines(lines);
        }
    }

    let best = find_best_route(&graph, &origin, &destination);
    match best.cost.finite() {
        Some(price) if best.reaches(&destination) => Reply::line(format!(
            "Best route: {} > ${price}",
            best.render(ROUTE_SEPARATOR)
        )),
        _ => Reply::line("Route not found."),
    }
}

/// Known locations that look like `query`, best match first.
///
/// Ties on score are ordered by identifier.
pub fn suggestions(graph: &RouteGraph, query: &str) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = graph
        .node_ids()
        .map(|id| (strsim::normalized_levenshtein(query, id), id))
        .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, id)| id.to_string())
        .collect()
}

// ============================================================================
// Session loop
// ============================================================================

/// Run a session until `exit` or end of input.
pub fn run_session<R, W>(guard: &RouteGuard, input: R, mut output: W) -> Result<ConsoleEvent>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{GREETING}")?;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            return Ok(ConsoleEvent::InputClosed);
        };
        match handle_line(guard, &line?) {
            Reply::Exit => return Ok(ConsoleEvent::Exited),
            Reply::Lines(replies) => {
                for reply in replies {
                    writeln!(output, "{reply}")?;
                }
            }
        }
    }
}

/// Start a session on stdin/stdout in a dedicated thread.
///
/// The returned receiver yields exactly one [`ConsoleEvent`] when the
/// session ends.
pub fn spawn(guard: Arc<RouteGuard>) -> Result<mpsc::Receiver<ConsoleEvent>> {
    spawn_session(guard, |guard| {
        run_session(guard, io::stdin().lock(), io::stdout())
    })
}

fn spawn_session<F>(guard: Arc<RouteGuard>, session: F) -> Result<mpsc::Receiver<ConsoleEvent>>
where
    F: FnOnce(&RouteGuard) -> Result<ConsoleEvent> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::Builder::new()
        .name("farepath-console".to_string())
        .spawn(move || {
            let event = match session(&guard) {
                Ok(event) => event,
                Err(e) => ConsoleEvent::Failed(e.to_string()),
            };
            tracing::debug!(?event, "console session ended");
            // The supervisor may already be gone during shutdown.
            let _ = tx.blocking_send(event);
        })
        .map_err(Error::io)?;
    Ok(rx)
}

// ============================================================================
// Tests
// ============================================================================

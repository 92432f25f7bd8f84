//! Line input from the terminal.

use std::io::{self, BufRead};
use tokio::sync::mpsc;
use tracing::warn;

/// Forward stdin lines to an async channel.
///
/// Reading happens on a plain OS thread that is never joined, so a pending
/// read cannot hold up runtime shutdown. The channel closes at end of input.
pub fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = std::thread::Builder::new()
        .name("stdin-lines".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        warn!("Could not start input reader: {}", e);
    }
    rx
}

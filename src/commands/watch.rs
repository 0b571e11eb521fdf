use gitexplore::{Config, Favorites, GitHubClient, QueryController, QueryState};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::fail;
use super::search::print_results;

/// What was last printed, so unchanged states aren't printed twice.
#[derive(Default)]
struct Shown {
    in_flight: bool,
    ids: Option<Vec<u64>>,
    error: Option<String>,
}

fn render(state: &QueryState, shown: &mut Shown, favorites: &Favorites) {
    if state.in_flight && !shown.in_flight {
        println!("Searching \"{}\"...", state.query.trim());
    }
    shown.in_flight = state.in_flight;

    if state.error != shown.error {
        if let Some(error) = &state.error {
            eprintln!("Search failed: {}", error);
        }
        shown.error = state.error.clone();
    }

    let ids: Vec<u64> = state.results.iter().map(|r| r.id).collect();
    if !state.in_flight && shown.ids.as_ref() != Some(&ids) {
        print_results(&state.results, favorites);
        shown.ids = Some(ids);
    }
}

/// Each line read from stdin replaces the query, as if typed into a search box.
pub async fn watch(client: GitHubClient, favorites: &Favorites, config: &Config) {
    let controller =
        QueryController::with_policy(client, config.debounce(), config.failure_policy);
    let mut rx = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = Shown::default();

    eprintln!(
        "Type a query and press enter ({} ms debounce). Ctrl-D to quit.",
        config.debounce_ms
    );

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(text)) => controller.on_input(text),
                Ok(None) => break,
                Err(e) => fail(&format!("Can't read input: {}", e)),
            },
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                render(&state, &mut shown, favorites);
            }
        }
    }

    controller.flush().await;
    render(&controller.state(), &mut shown, favorites);
}

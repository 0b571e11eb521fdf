use gitexplore::{Favorites, GitHubClient, Repository, RepositorySearch};

use super::fail;

/// One line per repository, marked when it is already a favorite.
pub fn print_results(repos: &[Repository], favorites: &Favorites) {
    if repos.is_empty() {
        println!("No repositories found.");
        return;
    }

    println!("\nFound {} repositories:\n", repos.len());
    for repo in repos {
        let marker = if favorites.contains(repo.id) { "★" } else { " " };
        println!("  {} {} (id {})", marker, repo.display_name(), repo.id);
        println!("      ⭐ {}  🍴 {}", repo.stargazers_count, repo.forks_count);
        println!("      {}", repo.description_or_default());
        if let Some(url) = &repo.html_url {
            println!("      {}", url);
        }
    }
    println!();
}

pub async fn search_repos(client: &GitHubClient, favorites: &Favorites, query: &str) {
    let query = query.trim();
    if query.is_empty() {
        println!("No repositories found.");
        return;
    }

    match client.search(query).await {
        Ok(resp) => print_results(&resp.items, favorites),
        Err(e) => fail(&e.to_string()),
    }
}

/// Finds a single repository by `owner/name`.
pub async fn lookup(client: &GitHubClient, repo: &str) -> Result<Repository, String> {
    let repo = repo
        .trim()
        .trim_start_matches("https://github.com/")
        .trim_end_matches(".git");
    if !repo.contains('/') {
        return Err(format!("Invalid repository format: {} (expected owner/name)", repo));
    }

    let resp = client
        .search(&format!("repo:{}", repo))
        .await
        .map_err(|e| e.to_string())?;

    resp.items
        .into_iter()
        .find(|r| r.full_name.eq_ignore_ascii_case(repo))
        .ok_or_else(|| format!("Repository not found: {}", repo))
}

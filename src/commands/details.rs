use chrono::Utc;
use gitexplore::types::relative_age;
use gitexplore::{GitHubClient, Repository};

use super::fail;
use super::search::lookup;

pub fn print_details(repo: &Repository) {
    let now = Utc::now();

    println!("\n{}", "=".repeat(60));
    println!("{}", repo.display_name());
    println!("{}", "=".repeat(60));
    println!("Avatar:   {}", repo.owner.avatar_url);
    println!("{}", repo.description_or_default());
    println!();
    println!("🌟 Stars:    {}", repo.stargazers_count);
    println!("🍴 Forks:    {}", repo.forks_count);
    println!("📦 Language: {}", repo.language_or_default());
    println!("Created:  {}", relative_age(&repo.created_at, now));
    println!("Updated:  {}", relative_age(&repo.updated_at, now));
    if let Some(url) = &repo.html_url {
        println!("URL:      {}", url);
    }
}

pub async fn show_details(client: &GitHubClient, repo: &str) {
    match lookup(client, repo).await {
        Ok(repo) => print_details(&repo),
        Err(e) => fail(&e),
    }
}

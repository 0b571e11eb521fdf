use chrono::Utc;
use gitexplore::types::relative_age;
use gitexplore::{Favorites, GitHubClient};

use super::details::print_details;
use super::fail;
use super::search::lookup;

pub fn list_favorites(favorites: &Favorites) {
    let set = favorites.snapshot();
    if set.is_empty() {
        println!("No favorites yet.");
        return;
    }

    let now = Utc::now();
    println!("Favorites:\n");
    for repo in set.iter() {
        println!("  ★ {} (id {})", repo.display_name(), repo.id);
        println!("    {}", repo.description_or_default());
        println!("    Created: {}", relative_age(&repo.created_at, now));
        println!("    Updated: {}", relative_age(&repo.updated_at, now));
        println!();
    }
}

pub async fn add_favorite(client: &GitHubClient, favorites: &Favorites, repo: &str, toggle: bool) {
    let repo = lookup(client, repo).await.unwrap_or_else(|e| fail(&e));

    if !toggle && favorites.contains(repo.id) {
        println!("{} is already a favorite.", repo.display_name());
        return;
    }

    match favorites.toggle(repo).await {
        Ok(notification) => println!("{}", notification.message()),
        Err(e) => fail(&format!("Favorites not updated: {}", e)),
    }
}

pub async fn remove_favorite(favorites: &Favorites, id: u64) {
    if !favorites.contains(id) {
        println!("No favorite with id {}.", id);
        return;
    }

    match favorites.remove(id).await {
        Ok(notification) => println!("{}", notification.message()),
        Err(e) => fail(&format!("Favorites not updated: {}", e)),
    }
}

pub fn show_favorite(favorites: &Favorites, id: u64) {
    match favorites.snapshot().get(id) {
        Some(repo) => print_details(repo),
        None => fail(&format!("No favorite with id {}.", id)),
    }
}

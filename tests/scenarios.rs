use std::time::Duration;

use gitexplore::store::FAVORITES_KEY;
use gitexplore::{
    Favorites, FavoritesSet, FileStore, KeyValueStore, MemoryStore, MockSearch, Notification,
    Owner, QueryController, Repository,
};

fn repo(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("someone/{}", name),
        description: Some(format!("{} repository", name)),
        owner: Owner {
            login: "someone".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
        },
        html_url: None,
        created_at: "2015-05-29T23:53:15Z".to_string(),
        updated_at: "2024-01-02T03:04:05Z".to_string(),
        stargazers_count: 1,
        forks_count: 0,
        language: None,
    }
}

#[tokio::test]
async fn empty_store_loads_empty_set() {
    let store = MemoryStore::new();
    let favorites = Favorites::load(store.clone()).await;

    assert!(favorites.snapshot().is_empty());
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn toggling_a_member_removes_and_persists() {
    let store = MemoryStore::new();
    let seeded = FavoritesSet::from_repos(vec![repo(1, "one")]);
    store.insert(FAVORITES_KEY, &seeded.to_json().unwrap());

    let favorites = Favorites::load(store.clone()).await;
    let mut notes = favorites.subscribe();

    let n = favorites.toggle(repo(1, "one")).await.unwrap();
    assert_eq!(n, Notification::Removed);
    assert_eq!(n.message(), "Removed from Favorites!");
    assert_eq!(notes.recv().await.unwrap(), Notification::Removed);

    assert!(favorites.snapshot().is_empty());
    let persisted = FavoritesSet::from_json(&store.value(FAVORITES_KEY).unwrap()).unwrap();
    assert!(persisted.is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_results_arrive_after_debounce() {
    let search = MockSearch::new();
    search.respond("redux", vec![repo(5, "redux")]);
    let controller = QueryController::new(search.clone(), Duration::from_millis(500));

    controller.on_input("redux");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(controller.state().results.is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(controller.state().results, vec![repo(5, "redux")]);
    assert_eq!(search.calls(), vec!["redux".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn failed_search_keeps_prior_results() {
    let search = MockSearch::new();
    search.respond("tokio", vec![repo(2, "tokio")]);
    search.fail("xyz", "network unreachable");
    let controller = QueryController::new(search, Duration::from_millis(500));

    controller.on_input("tokio");
    tokio::time::sleep(Duration::from_millis(600)).await;
    controller.on_input("xyz");
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = controller.state();
    assert_eq!(state.query, "xyz");
    assert_eq!(state.results, vec![repo(2, "tokio")]);
    assert!(!state.in_flight);
}

#[tokio::test]
async fn favorites_survive_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let favorites = Favorites::load(FileStore::new(&path)).await;
    favorites.toggle(repo(3, "three")).await.unwrap();
    favorites.toggle(repo(1, "one")).await.unwrap();
    favorites.toggle(repo(2, "two")).await.unwrap();
    favorites.remove(1).await.unwrap();

    let reopened = Favorites::load(FileStore::new(&path)).await;
    assert_eq!(reopened.snapshot().ids(), vec![3, 2]);
    assert_eq!(reopened.snapshot(), favorites.snapshot());
}

#[tokio::test]
async fn corrupted_file_store_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::new(&path);
    store.set(FAVORITES_KEY, "not json at all").await.unwrap();

    let favorites = Favorites::load(store.clone()).await;
    assert!(favorites.snapshot().is_empty());

    favorites.toggle(repo(8, "eight")).await.unwrap();
    let blob = store.get(FAVORITES_KEY).await.unwrap().unwrap();
    assert_eq!(FavoritesSet::from_json(&blob).unwrap().ids(), vec![8]);
}

#[tokio::test]
async fn whole_store_file_corrupted_still_accepts_toggles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").unwrap();

    let favorites = Favorites::load(FileStore::new(&path)).await;
    assert!(favorites.snapshot().is_empty());

    assert_eq!(favorites.toggle(repo(4, "four")).await.unwrap(), Notification::Added);
    assert_eq!(favorites.toggle(repo(6, "six")).await.unwrap(), Notification::Added);

    let reopened = Favorites::load(FileStore::new(&path)).await;
    assert_eq!(reopened.snapshot().ids(), vec![4, 6]);
}

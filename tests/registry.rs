//! Tests del registro guild → player: creación perezosa única y remoción.

mod common;

use common::{MockAnnouncer, MockFactory, MockSink};
use open_player::{PlayerConfig, PlayerRegistry, PlaybackSink, QueuedTrack, Track};
use pretty_assertions::assert_eq;
use serenity::model::id::GuildId;
use std::sync::Arc;

fn registry() -> Arc<PlayerRegistry> {
    common::init_tracing();
    Arc::new(PlayerRegistry::new(
        MockFactory::new(),
        MockAnnouncer::new(),
        PlayerConfig::default(),
    ))
}

#[tokio::test]
async fn test_get_player_returns_the_same_instance() {
    let registry = registry();
    let guild = GuildId::new(1);

    let first = registry.get_player(guild);
    let second = registry.get_player(guild);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_players_are_independent_per_guild() {
    let registry = registry();

    let one = registry.get_player(GuildId::new(1));
    let two = registry.get_player(GuildId::new(2));

    assert!(!Arc::ptr_eq(&one, &two));
    assert_eq!(registry.len(), 2);

    // encolar en un guild no bloquea al otro
    let sink = MockSink::new();
    one.join(sink as Arc<dyn PlaybackSink>).await;
    one.enqueue(QueuedTrack::new(Track::new("t", "https://t"))).await;
    assert!(one.is_blocked());
    assert!(!two.is_blocked());
}

#[tokio::test]
async fn test_concurrent_first_access_creates_one_player() {
    let registry = registry();
    let guild = GuildId::new(9);

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move { registry.get_player(guild) }));
    }

    let mut players = Vec::new();
    for task in tasks {
        players.push(task.await.expect("task should not panic"));
    }

    assert_eq!(registry.len(), 1);
    for player in &players {
        assert!(Arc::ptr_eq(player, &players[0]));
    }
}

#[tokio::test]
async fn test_remove_player_forgets_the_mapping() {
    let registry = registry();
    let guild = GuildId::new(3);

    let player = registry.get_player(guild);
    assert_eq!(registry.len(), 1);

    let removed = registry.remove_player(guild);
    assert!(removed.is_some());
    assert!(Arc::ptr_eq(&removed.unwrap(), &player));
    assert!(registry.is_empty());

    assert!(registry.remove_player(guild).is_none());

    // un nuevo acceso construye un player nuevo
    let fresh = registry.get_player(guild);
    assert!(!Arc::ptr_eq(&fresh, &player));
}

//! # Open Player
//!
//! Per-guild sequential music playback core for Discord bots.
//!
//! This crate implements the playback state machine only. Everything around
//! it — command registration, embeds, media resolution, the actual voice
//! connection — stays outside, behind three collaborator traits:
//!
//! - [`sources::SourceFactory`]: builds a fresh audio stream from a URL, an
//!   optional filter expression and a start offset
//! - [`sink::PlaybackSink`]: the controllable output device (play / pause /
//!   resume / stop) that reports completion through a [`sink::CompletionHandle`]
//! - [`announce::Announcer`]: presentation hook for now-playing notifications
//!
//! ## Architecture
//!
//! ### [`player`] - Music Player
//! - One player per guild, driven by a long-lived background task
//! - Mid-stream mutation (seek / filter change) by tearing the stream down
//!   and rebuilding it at a computed offset, preserving pause state
//! - Stale completion callbacks are rejected by attempt token, so a stream
//!   superseded by a manual transition can never clobber its replacement
//!
//! ### [`queue`] - Track Queue
//! - Unbounded FIFO with one extension: front insertion, reserved for the
//!   player's own seek/filter re-entries
//! - Multiple producers, single consumer (the player loop)
//!
//! ### [`registry`] - Player Registry
//! - Lazy guild → player map; at most one player and one loop per guild
//!
//! ### [`filters`] - Filter Catalog
//! - Static identifier → display name → ffmpeg expression catalog
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use open_player::{PlayerConfig, PlayerRegistry, QueuedTrack, Track};
//! use serenity::model::id::GuildId;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     factory: Arc<dyn open_player::SourceFactory>,
//! #     announcer: Arc<dyn open_player::Announcer>,
//! #     sink: Arc<dyn open_player::PlaybackSink>,
//! # ) -> anyhow::Result<()> {
//! let registry = PlayerRegistry::new(factory, announcer, PlayerConfig::load()?);
//! let player = registry.get_player(GuildId::new(123456789));
//!
//! player.join(sink).await;
//! let track = Track::new("Song", "https://example.com/stream").with_duration_secs(180);
//! player.enqueue(QueuedTrack::new(track)).await;
//!
//! player.pause().await;
//! player.resume().await;
//! player.seek(60).await;
//! # Ok(())
//! # }
//! ```

pub mod announce;
pub mod config;
pub mod filters;
pub mod player;
pub mod queue;
pub mod registry;
pub mod sink;
pub mod sources;
pub mod track;

pub use announce::Announcer;
pub use config::PlayerConfig;
pub use filters::FilterPreset;
pub use player::{ActionResponse, EnqueueOutcome, Player};
pub use queue::TrackQueue;
pub use registry::PlayerRegistry;
pub use sink::{CompletionHandle, PlaybackSink, PlayerEvent};
pub use sources::{AudioStream, SourceFactory};
pub use track::{QueuedTrack, SourceKind, Track};

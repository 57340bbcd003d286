//! Colaboradores simulados para los tests de integración del player:
//! fábrica de fuentes, sink de voz y anunciador, todos instrumentados.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serenity::model::id::GuildId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use open_player::{
    Announcer, AudioStream, CompletionHandle, PlaybackSink, SourceFactory, Track,
};

/// Lo que la fábrica construyó: el "stream" que viaja hasta el sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSpec {
    pub url: String,
    pub filter: Option<String>,
    pub offset_secs: u64,
}

#[derive(Default)]
pub struct MockFactory {
    pub built: Mutex<Vec<BuiltSpec>>,
    pub fail_next: AtomicBool,
}

impl MockFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_built(&self) -> Option<BuiltSpec> {
        self.built.lock().last().cloned()
    }

    pub fn built_urls(&self) -> Vec<String> {
        self.built.lock().iter().map(|s| s.url.clone()).collect()
    }
}

#[async_trait]
impl SourceFactory for MockFactory {
    async fn build_source(
        &self,
        url: &str,
        filter_expression: Option<&str>,
        offset: Duration,
    ) -> Result<AudioStream> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("simulated source build failure for {url}");
        }

        let spec = BuiltSpec {
            url: url.to_string(),
            filter: filter_expression.map(str::to_string),
            offset_secs: offset.as_secs(),
        };
        self.built.lock().push(spec.clone());
        Ok(Box::new(spec))
    }
}

#[derive(Default)]
struct SinkInner {
    playing: bool,
    paused: bool,
    active_handle: Option<CompletionHandle>,
    /// Todos los handles recibidos, en orden, para simular callbacks obsoletos
    handles: Vec<CompletionHandle>,
    played: Vec<BuiltSpec>,
}

/// Sink controlable en memoria. `stop()` dispara el handle activo, igual que
/// exige el contrato; `finish_current()` simula el fin natural del stream.
#[derive(Default)]
pub struct MockSink {
    inner: Mutex<SinkInner>,
    pub fail_next_stop: AtomicBool,
    pause_delay: Mutex<Option<Duration>>,
}

impl MockSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// La próxima pausa se demora antes de aplicarse, para cruzarla con
    /// eventos que llegan mientras la llamada al sink está en vuelo
    pub fn delay_next_pause(&self, delay: Duration) {
        *self.pause_delay.lock() = Some(delay);
    }

    /// El stream activo se agota por sí solo
    pub fn finish_current(&self) {
        let handle = {
            let mut inner = self.inner.lock();
            inner.playing = false;
            inner.paused = false;
            inner.active_handle.take()
        };
        if let Some(handle) = handle {
            handle.complete(None);
        }
    }

    /// El stream activo muere con un error del pipeline de audio
    pub fn fail_current(&self, error: &str) {
        let handle = {
            let mut inner = self.inner.lock();
            inner.playing = false;
            inner.paused = false;
            inner.active_handle.take()
        };
        if let Some(handle) = handle {
            handle.complete(Some(error.to_string()));
        }
    }

    /// Handle del intento n-ésimo (0-based), para re-disparos obsoletos
    pub fn handle_at(&self, index: usize) -> CompletionHandle {
        self.inner.lock().handles[index].clone()
    }

    pub fn play_count(&self) -> usize {
        self.inner.lock().played.len()
    }

    pub fn last_played(&self) -> Option<BuiltSpec> {
        self.inner.lock().played.last().cloned()
    }
}

#[async_trait]
impl PlaybackSink for MockSink {
    async fn play(&self, stream: AudioStream, on_end: CompletionHandle) -> Result<()> {
        let spec = stream
            .downcast::<BuiltSpec>()
            .map_err(|_| anyhow::anyhow!("unexpected stream type"))?;

        let mut inner = self.inner.lock();
        inner.playing = true;
        inner.paused = false;
        inner.active_handle = Some(on_end.clone());
        inner.handles.push(on_end);
        inner.played.push(*spec);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let delay = self.pause_delay.lock().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock();
        if inner.playing {
            inner.playing = false;
            inner.paused = true;
        }
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.paused {
            inner.paused = false;
            inner.playing = true;
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if self.fail_next_stop.swap(false, Ordering::SeqCst) {
            anyhow::bail!("simulated stop failure");
        }

        let handle = {
            let mut inner = self.inner.lock();
            inner.playing = false;
            inner.paused = false;
            inner.active_handle.take()
        };
        // el contrato exige que una parada manual también dispare el callback
        if let Some(handle) = handle {
            handle.complete(None);
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().playing
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().paused
    }
}

#[derive(Default)]
pub struct MockAnnouncer {
    pub announced: Mutex<Vec<(String, u64)>>,
    pub fail: AtomicBool,
}

impl MockAnnouncer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn titles(&self) -> Vec<String> {
        self.announced.lock().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl Announcer for MockAnnouncer {
    async fn now_playing(
        &self,
        _guild_id: GuildId,
        track: &Track,
        position: Duration,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("simulated announcer outage");
        }
        self.announced
            .lock()
            .push((track.title.clone(), position.as_secs()));
        Ok(())
    }
}

/// Cede el scheduler (y el reloj virtual) para que el loop del player procese
/// sus eventos pendientes
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

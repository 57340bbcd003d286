use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::trace;

use crate::sources::AudioStream;

/// Eventos que llegan al inbox del loop de un player
#[derive(Debug)]
pub enum PlayerEvent {
    /// El sink terminó de emitir un stream, por agotarse o por un `stop()`
    TrackEnded {
        /// Token del intento de reproducción al que corresponde el fin
        attempt: u64,
        error: Option<String>,
    },
}

/// Handle de finalización que el player entrega al sink junto con cada stream.
///
/// Puede invocarse desde cualquier hilo: no toca el estado del player, solo
/// publica el evento en el inbox del loop dueño. El token de intento permite
/// descartar callbacks de streams ya reemplazados.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    tx: mpsc::UnboundedSender<PlayerEvent>,
    attempt: u64,
}

impl CompletionHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<PlayerEvent>, attempt: u64) -> Self {
        Self { tx, attempt }
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Notifica el fin del stream al loop del player
    pub fn complete(&self, error: Option<String>) {
        let event = PlayerEvent::TrackEnded {
            attempt: self.attempt,
            error,
        };
        if self.tx.send(event).is_err() {
            // el loop ya terminó (leave); no queda nadie a quien despertar
            trace!("🌀 Fin de stream descartado: el player ya no existe");
        }
    }
}

/// Sink de reproducción controlable (la conexión de voz).
///
/// `stop()` debe disparar de forma confiable el `CompletionHandle` del stream
/// activo; un sink que se lo trague en las paradas manuales rompe la máquina
/// de estados del player.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    /// Comienza a emitir el stream y retiene el handle para el fin
    async fn play(&self, stream: AudioStream, on_end: CompletionHandle) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn resume(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    /// Emitiendo audio activamente (pausado no cuenta)
    fn is_playing(&self) -> bool;

    fn is_paused(&self) -> bool;
}

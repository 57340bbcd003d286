use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::time::Duration;

/// Stream de audio listo para reproducir, opaco para el player.
///
/// El backend concreto (songbird, un proceso ffmpeg, un mock de test) lo
/// produce en la fábrica y lo recupera con `downcast` en su sink.
pub type AudioStream = Box<dyn Any + Send>;

/// Fábrica de fuentes de audio.
///
/// Dada la URL de stream de una pista, una expresión de filtro opcional y un
/// offset, construye un stream fresco. Debe soportar llamadas repetidas para
/// la misma URL con offsets distintos: el player la invoca de nuevo en cada
/// seek, cambio de filtro y avance de cola.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    async fn build_source(
        &self,
        url: &str,
        filter_expression: Option<&str>,
        offset: Duration,
    ) -> Result<AudioStream>;
}

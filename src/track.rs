use std::time::Duration;

use crate::filters::FilterPreset;

/// Origen del que proviene una pista
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    YouTube,
    SoundCloud,
    DirectUrl,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::YouTube => "YouTube",
            SourceKind::SoundCloud => "SoundCloud",
            SourceKind::DirectUrl => "Direct URL",
        }
    }
}

/// Metadatos de una unidad reproducible, ya resueltos por el resolver externo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub author: String,
    pub author_url: Option<String>,
    /// Duración en segundos, 0 = desconocida
    pub duration_secs: u64,
    /// URL de stream canónica que consume la fábrica de fuentes
    pub url: String,
    pub webpage_url: String,
    pub thumbnail_url: Option<String>,
    pub source: SourceKind,
    pub likes: Option<u64>,
    pub requested_by: Option<String>,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: title.into(),
            author: String::new(),
            author_url: None,
            duration_secs: 0,
            webpage_url: url.clone(),
            url,
            thumbnail_url: None,
            source: SourceKind::YouTube,
            likes: None,
            requested_by: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_author_url(mut self, author_url: impl Into<String>) -> Self {
        self.author_url = Some(author_url.into());
        self
    }

    pub fn with_duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_webpage_url(mut self, webpage_url: impl Into<String>) -> Self {
        self.webpage_url = webpage_url.into();
        self
    }

    pub fn with_thumbnail_url(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = Some(requested_by.into());
        self
    }

    /// Duración conocida como `Duration`, `None` si es 0/desconocida
    pub fn duration(&self) -> Option<Duration> {
        if self.duration_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.duration_secs))
        }
    }
}

/// Una pista junto con las instrucciones transitorias de reproducción.
///
/// Las instrucciones no forman parte de la identidad de la pista: las genera
/// el propio player cuando re-inserta la pista actual (seek / cambio de
/// filtro) y se consumen al iniciar el stream.
#[derive(Debug, Clone)]
pub struct QueuedTrack {
    pub track: Track,
    pub filter: FilterPreset,
    /// Offset inicial del stream en segundos
    pub offset_secs: u64,
    /// Pausar inmediatamente después de arrancar el stream
    pub start_paused: bool,
    /// No emitir el anuncio de "now playing"
    pub suppress_announce: bool,
    /// Época de la transición manual que generó esta re-entrada; el loop
    /// descarta la entrada si la transición fue revertida
    pub(crate) restart_token: Option<u64>,
}

impl QueuedTrack {
    pub fn new(track: Track) -> Self {
        Self {
            track,
            filter: FilterPreset::None,
            offset_secs: 0,
            start_paused: false,
            suppress_announce: false,
            restart_token: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterPreset) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_start_paused(mut self, start_paused: bool) -> Self {
        self.start_paused = start_paused;
        self
    }
}

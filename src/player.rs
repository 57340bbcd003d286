use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use serenity::model::id::GuildId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    announce::Announcer,
    config::PlayerConfig,
    filters::FilterPreset,
    queue::TrackQueue,
    sink::{CompletionHandle, PlaybackSink, PlayerEvent},
    sources::SourceFactory,
    track::QueuedTrack,
};

/// Resultado de una operación del player, pensado para mostrarse tal cual.
///
/// Las condiciones de usuario ("no hay nada sonando", "ya está pausado") son
/// valores, nunca errores propagados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Resultado de un `enqueue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// El player estaba libre y la pista arrancó de inmediato
    Started,
    /// Había audio activo o cola pendiente; la pista quedó en la posición dada
    Queued { position: usize },
    /// La fábrica de fuentes no pudo construir el stream; no se encoló nada
    Failed { reason: String },
}

/// Fases de la máquina de estados de reproducción.
///
/// `AwaitingRestart` marca una parada iniciada por el propio player (seek o
/// cambio de filtro): el fin de stream que provoca no debe tratarse como fin
/// natural de pista.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
    Paused,
    AwaitingRestart,
}

#[derive(Debug)]
struct PlayState {
    phase: Phase,
    current: Option<QueuedTrack>,
    /// Token del intento de reproducción vigente; los callbacks de intentos
    /// anteriores se descartan comparando contra este valor
    attempt: u64,
    /// Época de transiciones manuales; las re-entradas llevan la época con la
    /// que se crearon y una reversión la incrementa, invalidándolas
    restart_epoch: u64,
    played_at: Option<Instant>,
    paused_at: Option<Instant>,
}

impl PlayState {
    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.current = None;
        self.played_at = None;
        self.paused_at = None;
    }
}

/// Player de música de un guild: una cola, un sink y un loop que la consume.
///
/// Las operaciones mutadoras se serializan entre sí con un mutex propio; el
/// loop recibe los finales de stream por su inbox y decide si avanzar la cola
/// o ceder el control a la operación que detuvo el sink.
pub struct Player {
    guild_id: GuildId,
    queue: TrackQueue,
    factory: Arc<dyn SourceFactory>,
    announcer: Arc<dyn Announcer>,
    config: PlayerConfig,
    sink: RwLock<Option<Arc<dyn PlaybackSink>>>,
    state: Mutex<PlayState>,
    events_tx: mpsc::UnboundedSender<PlayerEvent>,
    /// Serializa enqueue/skip/pause/resume/seek/filter/join/leave, el
    /// arranque de pistas del loop y la aplicación de eventos del inbox
    op_lock: tokio::sync::Mutex<()>,
    shutdown: CancellationToken,
}

impl Player {
    /// Crea el player y arranca su loop como tarea de fondo
    pub fn spawn(
        guild_id: GuildId,
        factory: Arc<dyn SourceFactory>,
        announcer: Arc<dyn Announcer>,
        config: PlayerConfig,
    ) -> Arc<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let player = Arc::new(Self {
            guild_id,
            queue: TrackQueue::new(),
            factory,
            announcer,
            config,
            sink: RwLock::new(None),
            state: Mutex::new(PlayState {
                phase: Phase::Idle,
                current: None,
                attempt: 0,
                restart_epoch: 0,
                played_at: None,
                paused_at: None,
            }),
            events_tx,
            op_lock: tokio::sync::Mutex::new(()),
            shutdown: CancellationToken::new(),
        });

        tokio::spawn(Arc::clone(&player).run(events_rx));

        player
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    // --- Estado derivado ---

    pub fn is_playing(&self) -> bool {
        self.state.lock().phase == Phase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().phase == Phase::Paused
    }

    /// Hay audio activo, pausado o cola pendiente: un enqueue no arranca solo
    pub fn is_blocked(&self) -> bool {
        self.state.lock().phase != Phase::Idle || !self.queue.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn current(&self) -> Option<QueuedTrack> {
        self.state.lock().current.clone()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Posición transcurrida de la pista actual.
    ///
    /// Pausado: instantánea `paused_at - played_at`; sonando: `ahora -
    /// played_at`. `played_at` ya viene corrido por el offset pedido, así que
    /// la cuenta sobrevive a los reinicios de stream.
    pub fn position(&self) -> Option<Duration> {
        let state = self.state.lock();
        let played_at = state.played_at?;
        match state.paused_at {
            Some(paused_at) => Some(paused_at.duration_since(played_at)),
            None => Some(played_at.elapsed()),
        }
    }

    fn sink(&self) -> Option<Arc<dyn PlaybackSink>> {
        self.sink.read().clone()
    }

    // --- Operaciones ---

    /// Encola una pista, o la arranca de inmediato si el player está libre
    pub async fn enqueue(&self, request: QueuedTrack) -> EnqueueOutcome {
        let _op = self.op_lock.lock().await;

        if self.is_blocked() {
            let position = self.queue.push_back(request.clone());
            info!(
                "➕ '{}' agregado a la cola del guild {} (posición {})",
                request.track.title, self.guild_id, position
            );
            return EnqueueOutcome::Queued { position };
        }

        info!(
            "🎶 Player libre en guild {}, arrancando '{}' de inmediato",
            self.guild_id, request.track.title
        );
        match self.start_streaming(request).await {
            Ok(()) => EnqueueOutcome::Started,
            Err(e) => {
                error!("❌ No se pudo arrancar la pista: {e:?}");
                EnqueueOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    /// Salta la pista actual; el fin de stream resultante avanza la cola
    pub async fn skip(&self) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        let title = {
            let state = self.state.lock();
            if !matches!(state.phase, Phase::Playing | Phase::Paused) {
                return ActionResponse::failure("No audio is currently playing.");
            }
            state
                .current
                .as_ref()
                .map(|c| c.track.title.clone())
                .unwrap_or_default()
        };

        let Some(sink) = self.sink() else {
            return ActionResponse::failure("Not connected to a voice channel.");
        };

        info!("⏭️ Saltando '{}' en guild {}", title, self.guild_id);
        // parada por la vía natural: sin supresión, el callback avanza la cola
        if let Err(e) = sink.stop().await {
            error!("❌ El sink no pudo detenerse en el skip: {e:?}");
            return ActionResponse::failure("Failed to skip the audio.");
        }

        ActionResponse::ok("Successfully skipped the audio.")
    }

    pub async fn pause(&self) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        {
            let state = self.state.lock();
            match state.phase {
                Phase::Paused => {
                    return ActionResponse::failure("The audio is already paused.")
                }
                Phase::Playing => {}
                _ => return ActionResponse::failure("No audio is currently playing."),
            }
        }

        let Some(sink) = self.sink() else {
            return ActionResponse::failure("Not connected to a voice channel.");
        };

        if let Err(e) = sink.pause().await {
            error!("❌ El sink no pudo pausar: {e:?}");
            return ActionResponse::failure("Failed to pause the audio.");
        }

        let mut state = self.state.lock();
        state.phase = Phase::Paused;
        state.paused_at = Some(Instant::now());
        debug!("⏸️ Audio pausado en guild {}", self.guild_id);

        ActionResponse::ok("Successfully paused the audio.")
    }

    pub async fn resume(&self) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        {
            let state = self.state.lock();
            if state.phase != Phase::Paused {
                return ActionResponse::failure("No audio is currently paused.");
            }
        }

        let Some(sink) = self.sink() else {
            return ActionResponse::failure("Not connected to a voice channel.");
        };

        if let Err(e) = sink.resume().await {
            error!("❌ El sink no pudo reanudar: {e:?}");
            return ActionResponse::failure("Failed to resume the audio.");
        }

        let mut state = self.state.lock();
        // correr played_at hacia adelante por lo que duró la pausa mantiene
        // la cuenta de posición en el valor previo a pausar
        if let (Some(played_at), Some(paused_at)) = (state.played_at, state.paused_at) {
            state.played_at = Some(played_at + paused_at.elapsed());
        }
        state.paused_at = None;
        state.phase = Phase::Playing;
        debug!("▶️ Audio reanudado en guild {}", self.guild_id);

        ActionResponse::ok("Successfully resumed the audio.")
    }

    /// Reinicia el stream actual en el offset pedido, preservando la pausa
    pub async fn seek(&self, offset_secs: u64) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        let re_entry = {
            let state = self.state.lock();
            if !matches!(state.phase, Phase::Playing | Phase::Paused) {
                return ActionResponse::failure("No audio is currently playing.");
            }
            let Some(current) = state.current.as_ref() else {
                return ActionResponse::failure("No audio is currently playing.");
            };

            // duración 0 = desconocida: sin cota superior para el seek
            let duration = current.track.duration_secs;
            if duration > 0 && offset_secs > duration {
                let length = humantime::format_duration(Duration::from_secs(duration));
                return ActionResponse::failure(format!(
                    "Cannot seek to {offset_secs} seconds. The track is only {length} long."
                ));
            }

            QueuedTrack {
                track: current.track.clone(),
                filter: current.filter,
                offset_secs,
                start_paused: state.phase == Phase::Paused,
                suppress_announce: true,
                restart_token: None,
            }
        };

        info!(
            "⏩ Seek a {}s de '{}' en guild {}",
            offset_secs, re_entry.track.title, self.guild_id
        );
        match self.restart_with(re_entry).await {
            Ok(()) => ActionResponse::ok(format!("Seeked to {offset_secs} seconds!")),
            Err(e) => {
                error!("❌ Falló la transición del seek: {e:?}");
                ActionResponse::failure("Failed to restart the stream.")
            }
        }
    }

    /// Reaplica el stream actual con otro filtro, en la posición transcurrida
    pub async fn set_filter(&self, preset: FilterPreset) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        let re_entry = {
            let state = self.state.lock();
            if !matches!(state.phase, Phase::Playing | Phase::Paused) {
                return ActionResponse::failure(
                    "No audio is currently playing, cannot apply a filter.",
                );
            }
            let Some(current) = state.current.as_ref() else {
                return ActionResponse::failure(
                    "No audio is currently playing, cannot apply a filter.",
                );
            };

            let position = match (state.played_at, state.paused_at) {
                (Some(played_at), Some(paused_at)) => paused_at.duration_since(played_at),
                (Some(played_at), None) => played_at.elapsed(),
                _ => Duration::ZERO,
            };

            QueuedTrack {
                track: current.track.clone(),
                filter: preset,
                offset_secs: position.as_secs(),
                start_paused: state.phase == Phase::Paused,
                suppress_announce: true,
                restart_token: None,
            }
        };

        info!(
            "🎛️ Aplicando filtro '{}' en {}s de '{}' en guild {}",
            preset.display_name(),
            re_entry.offset_secs,
            re_entry.track.title,
            self.guild_id
        );
        match self.restart_with(re_entry).await {
            Ok(()) => ActionResponse::ok(format!(
                "Successfully applied the '{}' filter.",
                preset.display_name()
            )),
            Err(e) => {
                error!("❌ Falló la transición de filtro: {e:?}");
                ActionResponse::failure("Failed to restart the stream.")
            }
        }
    }

    /// Conecta el sink de voz
    pub async fn join(&self, sink: Arc<dyn PlaybackSink>) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        if self.is_connected() {
            return ActionResponse::ok("Already in a voice channel, no need to join.");
        }

        *self.sink.write() = Some(sink);
        info!("🔊 Sink de voz conectado en guild {}", self.guild_id);
        ActionResponse::ok("Successfully joined the voice channel.")
    }

    /// Desconecta: descarta cola y pista actual y abandona el loop.
    /// Sin drenado: lo pendiente se pierde.
    pub async fn leave(&self) -> ActionResponse {
        let _op = self.op_lock.lock().await;

        let Some(sink) = self.sink() else {
            return ActionResponse::failure("Not currently in a voice channel.");
        };

        self.shutdown.cancel();
        {
            let mut state = self.state.lock();
            // invalida cualquier callback todavía en vuelo
            state.attempt = state.attempt.wrapping_add(1);
            state.reset();
        }

        if sink.is_playing() || sink.is_paused() {
            if let Err(e) = sink.stop().await {
                warn!("⚠️ El sink falló al detenerse durante el leave: {e:?}");
            }
        }
        self.queue.clear();
        *self.sink.write() = None;

        info!("👋 Player del guild {} desconectado", self.guild_id);
        ActionResponse::ok("Successfully disconnected from the voice channel.")
    }

    // --- Transición manual de seek / filtro ---

    /// Empuja la re-entrada al frente y detiene el sink marcando la parada
    /// como propia, para que el loop no la confunda con un fin de pista
    async fn restart_with(&self, mut re_entry: QueuedTrack) -> Result<()> {
        let sink = self.sink().context("no voice sink attached")?;

        let (previous_phase, epoch) = {
            let mut state = self.state.lock();
            let previous = state.phase;
            state.phase = Phase::AwaitingRestart;
            re_entry.restart_token = Some(state.restart_epoch);
            (previous, state.restart_epoch)
        };
        self.queue.push_front(re_entry);

        if let Err(e) = sink.stop().await {
            // revertir: invalidar la época deja muerta la re-entrada aunque
            // el loop ya la tenga en la mano; si sigue al frente, retirarla
            {
                let mut state = self.state.lock();
                state.restart_epoch = state.restart_epoch.wrapping_add(1);
                state.phase = previous_phase;
            }
            let _ = self
                .queue
                .pop_front_if(|entry| entry.restart_token == Some(epoch));
            return Err(e);
        }

        Ok(())
    }

    // --- Loop de reproducción ---

    async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<PlayerEvent>) {
        debug!("🎧 Loop de reproducción iniciado para guild {}", self.guild_id);

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let idle = self.state.lock().phase == Phase::Idle;

            if idle {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => self.apply_event(event).await,
                        None => break,
                    },
                    popped = tokio::time::timeout(self.config.queue_wait(), self.queue.pop_front()) => {
                        match popped {
                            Ok(next) => self.play_from_queue(next).await,
                            Err(_) => {
                                debug!(
                                    "⏳ Cola del guild {} sin actividad tras {}s, reintentando",
                                    self.guild_id, self.config.queue_wait_secs
                                );
                            }
                        }
                    }
                }
            } else {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => self.apply_event(event).await,
                        None => break,
                    },
                }
            }
        }

        debug!("🛑 Loop de reproducción terminado para guild {}", self.guild_id);
    }

    /// Arranque de una pista extraída de la cola por el loop
    async fn play_from_queue(&self, next: QueuedTrack) {
        if !self.is_connected() {
            warn!(
                "🔌 Sink desconectado en guild {}, devolviendo '{}' a la cola",
                self.guild_id, next.track.title
            );
            self.queue.push_front(next);
            tokio::time::sleep(self.config.reconnect_retry()).await;
            return;
        }

        let _op = self.op_lock.lock().await;

        // una re-entrada de una transición ya revertida no debe reproducirse
        if let Some(token) = next.restart_token {
            if token != self.state.lock().restart_epoch {
                debug!(
                    "🗑️ Re-entrada obsoleta de '{}' descartada en guild {}",
                    next.track.title, self.guild_id
                );
                return;
            }
        }

        // el pop pudo haber quedado armado desde una iteración en reposo
        // anterior: si mientras tanto un enqueue arrancó audio directo (o un
        // seek dejó una transición en vuelo), esta extracción fue prematura
        if self.state.lock().phase != Phase::Idle {
            debug!(
                "↩️ '{}' extraída con el player de guild {} ocupado, devuelta al frente",
                next.track.title, self.guild_id
            );
            self.queue.push_front(next);
            return;
        }

        if let Err(e) = self.start_streaming(next).await {
            // sin reintento automático: la entrada se descarta y la cola sigue
            error!(
                "❌ No se pudo iniciar el stream en guild {}: {e:?}",
                self.guild_id
            );
        }
    }

    /// Construye la fuente y arranca el sink, dejando el estado consistente.
    ///
    /// O bien el estado completo (current, timestamps, token) queda aplicado
    /// junto con el sink sonando, o bien todo vuelve a como estaba.
    async fn start_streaming(&self, request: QueuedTrack) -> Result<()> {
        let sink = self.sink().context("no voice sink attached")?;

        let offset = Duration::from_secs(request.offset_secs);
        let stream = self
            .factory
            .build_source(&request.track.url, request.filter.expression(), offset)
            .await
            .with_context(|| format!("building source for '{}'", request.track.title))?;

        // defensivo: a esta altura el sink debería estar en reposo; si no lo
        // está, el fin que dispare esta parada quedará como callback obsoleto
        if sink.is_playing() || sink.is_paused() {
            warn!(
                "⚠️ El sink del guild {} seguía activo antes de una pista nueva",
                self.guild_id
            );
            sink.stop().await?;
        }

        let handle = {
            let mut state = self.state.lock();
            state.attempt = state.attempt.wrapping_add(1);
            state.phase = Phase::Playing;
            state.current = Some(request.clone());
            let now = Instant::now();
            // ahora menos el offset pedido: la cuenta de posición queda bien
            // aunque el stream haya nacido a mitad de la pista
            state.played_at = Some(now.checked_sub(offset).unwrap_or(now));
            state.paused_at = None;
            CompletionHandle::new(self.events_tx.clone(), state.attempt)
        };

        info!(
            "🎵 Reproduciendo '{}' en guild {} (offset {}s, filtro {})",
            request.track.title,
            self.guild_id,
            request.offset_secs,
            request.filter.display_name()
        );

        if let Err(e) = sink.play(stream, handle).await {
            self.state.lock().reset();
            return Err(e).context("sink refused to play the stream");
        }

        if request.start_paused {
            match sink.pause().await {
                Ok(()) => {
                    let mut state = self.state.lock();
                    state.phase = Phase::Paused;
                    state.paused_at = Some(Instant::now());
                    debug!("⏸️ Pista reanudada en pausa en guild {}", self.guild_id);
                }
                Err(e) => {
                    warn!("⚠️ No se pudo re-pausar tras el arranque: {e:?}");
                }
            }
        }

        if !request.suppress_announce {
            if let Err(e) = self
                .announcer
                .now_playing(self.guild_id, &request.track, offset)
                .await
            {
                // la presentación nunca afecta la reproducción
                warn!("📣 El anuncio de now playing falló: {e:?}");
            }
        }

        Ok(())
    }

    /// Aplica un evento del inbox bajo el mutex de operaciones: un fin de
    /// pista nunca se intercala a mitad de una operación que ya validó la fase
    async fn apply_event(&self, event: PlayerEvent) {
        let _op = self.op_lock.lock().await;
        match event {
            PlayerEvent::TrackEnded { attempt, error } => self.on_track_end(attempt, error),
        }
    }

    /// Fin de stream reportado por el sink.
    ///
    /// Solo el intento vigente puede mover la máquina de estados: un callback
    /// de un stream ya reemplazado se descarta como obsoleto.
    fn on_track_end(&self, attempt: u64, error: Option<String>) {
        let mut state = self.state.lock();

        if attempt != state.attempt {
            debug!(
                "🌀 Callback obsoleto en guild {} (intento {} vs {}), ignorado",
                self.guild_id, attempt, state.attempt
            );
            return;
        }

        if let Some(err) = error {
            error!(
                "❌ El stream de '{}' en guild {} terminó con error: {}",
                state
                    .current
                    .as_ref()
                    .map(|c| c.track.title.as_str())
                    .unwrap_or("<desconocido>"),
                self.guild_id,
                err
            );
        }

        match state.phase {
            Phase::AwaitingRestart => {
                // parada propia (seek / filtro): la re-entrada ya espera al
                // frente de la cola, no hay avance que hacer
                debug!(
                    "🔁 Parada manual confirmada en guild {}, la re-entrada sigue",
                    self.guild_id
                );
                state.phase = Phase::Idle;
            }
            Phase::Playing | Phase::Paused => {
                info!(
                    "🏁 Pista terminada en guild {}: {}",
                    self.guild_id,
                    state
                        .current
                        .as_ref()
                        .map(|c| c.track.title.as_str())
                        .unwrap_or("<desconocido>")
                );
                state.reset();
            }
            Phase::Idle => {
                debug!(
                    "🌀 Fin de stream con el player de guild {} en reposo, ignorado",
                    self.guild_id
                );
            }
        }
    }
}

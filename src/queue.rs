use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tracing::debug;

use crate::track::QueuedTrack;

/// Cola de pistas pendientes, FIFO con una extensión: inserción al frente.
///
/// La inserción al frente la usa únicamente el propio player para las
/// re-entradas de seek / cambio de filtro; un enqueue de usuario nunca la
/// alcanza. Varios productores pueden encolar a la vez, hay exactamente un
/// consumidor (el loop del player). Sin límite de capacidad.
#[derive(Debug, Default)]
pub struct TrackQueue {
    items: Mutex<VecDeque<QueuedTrack>>,
    available: Notify,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    /// Encola al final y devuelve el largo resultante (la posición de la pista)
    pub fn push_back(&self, track: QueuedTrack) -> usize {
        let len = {
            let mut items = self.items.lock();
            items.push_back(track);
            items.len()
        };
        self.available.notify_one();
        len
    }

    /// Inserta al frente: la pista se consume antes que todo lo ya encolado
    pub(crate) fn push_front(&self, track: QueuedTrack) {
        {
            let mut items = self.items.lock();
            items.push_front(track);
        }
        self.available.notify_one();
    }

    /// Extrae la próxima pista, suspendiendo hasta que haya una disponible
    pub async fn pop_front(&self) -> QueuedTrack {
        loop {
            if let Some(track) = self.items.lock().pop_front() {
                return track;
            }
            self.available.notified().await;
        }
    }

    /// Extrae la próxima pista sin esperar
    pub(crate) fn try_pop_front(&self) -> Option<QueuedTrack> {
        self.items.lock().pop_front()
    }

    /// Extrae el frente solo si cumple el predicado
    pub(crate) fn pop_front_if(
        &self,
        predicate: impl FnOnce(&QueuedTrack) -> bool,
    ) -> Option<QueuedTrack> {
        let mut items = self.items.lock();
        if items.front().is_some_and(predicate) {
            items.pop_front()
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Descarta todo lo pendiente
    pub fn clear(&self) {
        let mut items = self.items.lock();
        if !items.is_empty() {
            debug!("🗑️ Cola descartada: {} pistas pendientes", items.len());
        }
        items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    fn entry(title: &str) -> QueuedTrack {
        QueuedTrack::new(Track::new(title, format!("https://example.com/{title}")))
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = TrackQueue::new();
        assert_eq!(queue.push_back(entry("a")), 1);
        assert_eq!(queue.push_back(entry("b")), 2);
        assert_eq!(queue.push_back(entry("c")), 3);

        assert_eq!(queue.pop_front().await.track.title, "a");
        assert_eq!(queue.pop_front().await.track.title, "b");
        assert_eq!(queue.pop_front().await.track.title, "c");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_push_front_preempts_pending_tracks() {
        let queue = TrackQueue::new();
        queue.push_back(entry("a"));
        queue.push_back(entry("b"));
        queue.push_front(entry("re-entry"));

        assert_eq!(queue.pop_front().await.track.title, "re-entry");
        assert_eq!(queue.pop_front().await.track.title, "a");
    }

    #[tokio::test]
    async fn test_pop_front_blocks_until_a_track_arrives() {
        let queue = Arc::new(TrackQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop_front().await.track.title })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        queue.push_back(entry("late"));
        let title = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should wake up")
            .expect("consumer task should not panic");
        assert_eq!(title, "late");
    }

    #[tokio::test]
    async fn test_pop_front_if_only_touches_a_matching_head() {
        let queue = TrackQueue::new();
        queue.push_back(entry("a"));
        queue.push_back(entry("b"));

        assert!(queue.pop_front_if(|t| t.track.title == "b").is_none());
        assert_eq!(queue.len(), 2);

        let popped = queue.pop_front_if(|t| t.track.title == "a");
        assert_eq!(popped.unwrap().track.title, "a");
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(TrackQueue::new());
        let mut producers = Vec::new();

        for producer in 0..8 {
            let queue = Arc::clone(&queue);
            producers.push(tokio::spawn(async move {
                for i in 0..25 {
                    queue.push_back(entry(&format!("p{producer}-{i}")));
                }
            }));
        }
        for producer in producers {
            producer.await.expect("producer should not panic");
        }

        assert_eq!(queue.len(), 8 * 25);
        let mut seen = std::collections::HashSet::new();
        while let Some(track) = queue.try_pop_front() {
            assert!(seen.insert(track.track.title.clone()), "duplicated track");
        }
        assert_eq!(seen.len(), 8 * 25);
    }
}

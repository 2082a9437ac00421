use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use crate::library::{Library, SongPos};

use super::clock::Clock;
use super::state::{PlaybackSnapshot, PlaybackState, PlaybackStatus};

/// Render target for the now-playing panel.
///
/// The timer thread calls `draw` with a snapshot taken under the state lock;
/// the lock is released before the call, so display I/O never blocks a
/// playback transition.
pub trait NowPlayingScreen: Send + Sync {
    fn draw(&self, snapshot: &PlaybackSnapshot);
}

/// Handle to the one active timer thread.
struct TimerTask {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl TimerTask {
    /// Signal the task and wait for it to exit. When the timer replaces
    /// itself during auto-advance it holds its own handle; joining there
    /// would deadlock, so that case only signals.
    fn stop(self) {
        let _ = self.stop_tx.send(());
        if self.handle.thread().id() != thread::current().id() {
            let _ = self.handle.join();
        }
    }
}

struct Inner {
    state: PlaybackState,
    timer: Option<TimerTask>,
    /// Bumped by every transition that takes the timer slot. A tick that
    /// wakes up holding a stale epoch exits without touching state, which
    /// closes the race between a command cancelling a timer and that timer
    /// already waiting on the lock.
    epoch: u64,
}

struct Shared {
    library: Arc<Library>,
    clock: Arc<dyn Clock>,
    screen: Arc<dyn NowPlayingScreen>,
    tick: Duration,
    inner: Mutex<Inner>,
}

/// The playback engine.
///
/// All operations serialize through one mutex guarding the playback state,
/// the timer slot and the epoch counter. Commands may arrive from the
/// interactive thread while the timer concurrently updates elapsed time;
/// neither ever observes a partial transition.
pub struct Player {
    shared: Arc<Shared>,
}

impl Player {
    pub fn new(
        library: Arc<Library>,
        clock: Arc<dyn Clock>,
        screen: Arc<dyn NowPlayingScreen>,
        tick: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                library,
                clock,
                screen,
                tick,
                inner: Mutex::new(Inner {
                    state: PlaybackState::default(),
                    timer: None,
                    epoch: 0,
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap()
    }

    /// Start playing the song at `pos`.
    ///
    /// Selecting the song that is already current is a no-op: elapsed time is
    /// preserved and the timer is not restarted. Otherwise the previous timer
    /// task is cancelled and joined before the new state is written, so two
    /// timers never race on the same state. The caller is responsible for
    /// bounds-checking `pos` against the library.
    pub fn play(&self, pos: SongPos) {
        let prev = {
            let mut inner = self.lock();
            if inner.state.current == Some(pos) {
                return;
            }
            inner.epoch += 1;
            inner.timer.take()
        };
        if let Some(task) = prev {
            task.stop();
        }
        let mut inner = self.lock();
        start_song(&self.shared, &mut inner, pos);
    }

    /// Toggle between playing and paused. No-op when stopped.
    ///
    /// Resuming shifts the start timestamp forward by the pause duration, so
    /// elapsed time continues where it left off.
    pub fn pause(&self) {
        let mut inner = self.lock();
        let now = self.shared.clock.now();
        if inner.state.playing && !inner.state.paused {
            inner.state.pause_started = now;
            inner.state.paused = true;
            debug!("playback paused");
        } else if inner.state.playing && inner.state.paused {
            let paused_for = now.saturating_sub(inner.state.pause_started);
            inner.state.started_at += paused_for;
            inner.state.paused = false;
            debug!(paused_for_secs = paused_for.as_secs(), "playback resumed");
        }
    }

    /// Stop playback: cancel and join the timer task, then reset the state
    /// to its empty form. Idempotent when already stopped.
    pub fn stop(&self) {
        let prev = {
            let mut inner = self.lock();
            if !inner.state.playing {
                return;
            }
            inner.epoch += 1;
            inner.timer.take()
        };
        if let Some(task) = prev {
            task.stop();
        }
        let mut inner = self.lock();
        inner.state.reset();
        debug!("playback stopped");
    }

    /// Play the next song: the following song on the album, or the first
    /// song of the next album. No-op with no current song or at the end of
    /// the library.
    pub fn next_song(&self) {
        let next = {
            let inner = self.lock();
            inner
                .state
                .current
                .and_then(|pos| self.shared.library.next_position(pos))
        };
        if let Some(pos) = next {
            self.play(pos);
        }
    }

    /// Play the previous song: the preceding song on the album, or the last
    /// song of the previous album. No-op with no current song or at the
    /// start of the library.
    pub fn previous_song(&self) {
        let prev = {
            let inner = self.lock();
            inner
                .state
                .current
                .and_then(|pos| self.shared.library.prev_position(pos))
        };
        if let Some(pos) = prev {
            self.play(pos);
        }
    }

    /// Derived playback status.
    pub fn playback_status(&self) -> PlaybackStatus {
        self.lock().state.status()
    }

    /// Show or hide the now-playing panel.
    pub fn set_visible(&self, visible: bool) {
        self.lock().state.visible = visible;
    }

    /// Consistent view of the current state, resolved against the library.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let inner = self.lock();
        snapshot_locked(&self.shared, &inner.state)
    }
}

impl Drop for Player {
    /// Playback must stop on every exit path, including panics unwinding
    /// through the session.
    fn drop(&mut self) {
        self.stop();
    }
}

/// Write the start-of-song state and spawn its timer task. Caller holds the
/// lock; any previous timer has already been taken out of the slot.
fn start_song(shared: &Arc<Shared>, inner: &mut Inner, pos: SongPos) {
    inner.epoch += 1;
    let epoch = inner.epoch;

    inner.state.current = Some(pos);
    inner.state.playing = true;
    inner.state.paused = false;
    inner.state.elapsed = Duration::ZERO;
    inner.state.started_at = shared.clock.now();

    let (stop_tx, stop_rx) = mpsc::channel();
    let shared = Arc::clone(shared);
    let handle = thread::spawn(move || run_timer(shared, epoch, stop_rx));
    inner.timer = Some(TimerTask { stop_tx, handle });
    debug!(album = pos.album, song = pos.song, "song started");
}

/// The song under the timer finished: move to the next song, or reset to the
/// stopped state at the end of the library. Caller is the timer thread,
/// holding the lock, and exits right after.
fn advance_locked(shared: &Arc<Shared>, inner: &mut Inner) {
    inner.epoch += 1;
    // Own handle; dropping it detaches a thread that is already returning.
    drop(inner.timer.take());

    let next = inner
        .state
        .current
        .and_then(|pos| shared.library.next_position(pos));
    match next {
        Some(pos) => start_song(shared, inner, pos),
        None => {
            debug!("end of library reached");
            inner.state.reset();
        }
    }
}

/// Timer loop: one per active song.
///
/// Ticks immediately so the panel appears as soon as playback starts, then
/// waits on the stop channel with the tick interval as timeout (cooperative
/// cancellation, at most one tick of latency). Any internal failure exits
/// the loop rather than propagating into the foreground.
fn run_timer(shared: Arc<Shared>, epoch: u64, stop_rx: Receiver<()>) {
    loop {
        let snapshot = {
            let Ok(mut inner) = shared.inner.lock() else {
                return;
            };
            if inner.epoch != epoch || !inner.state.playing {
                return;
            }

            if !inner.state.paused {
                let now = shared.clock.now();
                inner.state.elapsed = now.saturating_sub(inner.state.started_at);

                let total = inner
                    .state
                    .current
                    .and_then(|pos| shared.library.song_at(pos))
                    .map(|(_, song)| song.duration);
                // Unresolvable coordinates count as finished rather than
                // ticking forever on a song that no longer exists.
                let finished = match total {
                    Some(total) => inner.state.elapsed >= total,
                    None => true,
                };
                if finished {
                    advance_locked(&shared, &mut inner);
                    return;
                }
            }

            if inner.state.visible {
                Some(snapshot_locked(&shared, &inner.state))
            } else {
                None
            }
        };

        if let Some(snapshot) = snapshot {
            trace!(elapsed_secs = snapshot.elapsed.as_secs(), "render tick");
            shared.screen.draw(&snapshot);
        }

        match stop_rx.recv_timeout(shared.tick) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

fn snapshot_locked(shared: &Shared, state: &PlaybackState) -> PlaybackSnapshot {
    let resolved = state.current.and_then(|pos| shared.library.song_at(pos));
    PlaybackSnapshot {
        status: state.status(),
        current: state.current,
        song: resolved.map(|(_, song)| song.name.clone()),
        album: resolved.map(|(album, _)| album.title.clone()),
        artist: resolved.map(|(album, _)| album.artist.clone()),
        elapsed: state.elapsed,
        total: resolved.map(|(_, song)| song.duration),
        visible: state.visible,
    }
}

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};
use wirecall_codec::{WireCursor, WireWriter};
use wirecall_frame::{frame_message, CommandCatalog, FrameStatus};

use crate::error::{CallError, Result};
use crate::transport::Transport;

/// Timing configuration for one channel.
#[derive(Debug, Clone)]
pub struct CallConfig {
    /// How long a caller waits for its reply before giving up.
    /// `None` waits indefinitely — a lost reply then blocks the
    /// calling thread forever, so only use that on lossless links.
    pub reply_timeout: Option<Duration>,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// Shared state between the one awaiting caller and the receive
/// thread. Mutated only under its mutex, held only for single
/// reads/writes — never across a blocking call.
#[derive(Default)]
struct Handoff {
    /// A caller is somewhere between arming and consuming.
    expecting: bool,
    /// The caller is suspended, ready to accept a reply.
    parked: bool,
    /// The published reply, alive from publish until the caller takes
    /// it.
    reply: Option<Bytes>,
}

struct Sync {
    state: Mutex<Handoff>,
    /// Receive thread -> caller: a reply has been published.
    caller_resume: Condvar,
    /// Caller -> receive thread: the handoff state changed (caller
    /// parked, reply consumed, or expectation withdrawn).
    parser_resume: Condvar,
}

/// One logical request/reply endpoint.
///
/// Any number of threads may call procedures; the caller-exclusion
/// lock serializes them so at most one call is in flight. One
/// dedicated thread feeds received bytes through [`Channel::parse_reply`].
pub struct Channel<T> {
    transport: Mutex<T>,
    replies: &'static CommandCatalog,
    config: CallConfig,
    /// Caller exclusion: held for the whole call, send through decode.
    caller: Mutex<()>,
    /// Sender exclusion: the outgoing buffer, exclusive during one
    /// call's serialization.
    send_buf: Mutex<BytesMut>,
    sync: Sync,
}

impl<T: Transport> Channel<T> {
    /// Create a channel over `transport`. `replies` is the catalog of
    /// every reply identifier this channel can receive.
    pub fn new(transport: T, replies: &'static CommandCatalog) -> Self {
        Self::with_config(transport, replies, CallConfig::default())
    }

    pub fn with_config(transport: T, replies: &'static CommandCatalog, config: CallConfig) -> Self {
        Self {
            transport: Mutex::new(transport),
            replies,
            config,
            caller: Mutex::new(()),
            send_buf: Mutex::new(BytesMut::with_capacity(256)),
            sync: Sync {
                state: Mutex::new(Handoff::default()),
                caller_resume: Condvar::new(),
                parser_resume: Condvar::new(),
            },
        }
    }

    /// The reply catalog this channel frames against.
    pub fn replies(&self) -> &'static CommandCatalog {
        self.replies
    }

    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Invoke one remote procedure and block until its reply arrives.
    ///
    /// `encode` writes the arguments in declared order; `decode` reads
    /// the outputs in declared order. Generated stubs are thin
    /// bindings over this routine — the synchronization lives here,
    /// once.
    pub fn call<R>(
        &self,
        request: u8,
        reply: u8,
        encode: impl FnOnce(&mut WireWriter<'_>),
        decode: impl FnOnce(&mut WireCursor<'_>) -> wirecall_codec::Result<R>,
    ) -> Result<R> {
        // Serializes concurrent callers; request N's reply is fully
        // consumed before request N+1 starts serializing.
        let _caller = lock(&self.caller);

        // Armed before the request leaves, cleared on every exit path
        // (success, timeout, transmit failure, panic) so the receive
        // thread can always resolve whether anyone is waiting.
        let _expect = ExpectGuard::arm(&self.sync);

        let message = {
            let mut buf = lock(&self.send_buf);
            buf.clear();
            let mut writer = WireWriter::new(&mut buf);
            writer.put(&request);
            encode(&mut writer);
            buf.split().freeze()
        };

        lock(&self.transport).transmit(&message)?;
        trace!(request, len = message.len(), "request transmitted");

        let framed = self.await_reply()?;

        let mut cursor = WireCursor::new(&framed);
        let got: u8 = cursor.take()?;
        if got != reply {
            warn!(expected = reply, got, "reply identifier mismatch");
            return Err(CallError::ReplyMismatch {
                expected: reply,
                got,
            });
        }
        let value = decode(&mut cursor)?;
        if cursor.remaining() != 0 {
            warn!(
                reply,
                left = cursor.remaining(),
                "reply not fully consumed; catalog and decode disagree"
            );
        }
        Ok(value)
    }

    /// Park until the receive thread publishes a reply.
    fn await_reply(&self) -> Result<Bytes> {
        let mut state = lock(&self.sync.state);
        state.parked = true;
        // The receive thread may already hold a framed reply and be
        // waiting for us to park.
        self.sync.parser_resume.notify_one();

        let deadline = self.config.reply_timeout.map(|t| (t, Instant::now() + t));
        loop {
            if let Some(reply) = state.reply.take() {
                state.parked = false;
                // Consumption acknowledged: the receive thread may
                // move on to the next message.
                self.sync.parser_resume.notify_one();
                return Ok(reply);
            }
            state = match deadline {
                Some((timeout, deadline)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.parked = false;
                        self.sync.parser_resume.notify_one();
                        debug!(?timeout, "caller gave up waiting for reply");
                        return Err(CallError::Timeout(timeout));
                    }
                    let (state, _) = self
                        .sync
                        .caller_resume
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    state
                }
                None => self
                    .sync
                    .caller_resume
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    /// Receive-side entry point, run by the dispatch thread on each
    /// accumulated buffer.
    ///
    /// Frames `buf` and, when it holds a complete reply, hands it to
    /// the awaiting caller, blocking until the caller has taken it.
    /// A complete reply nobody is awaiting is an orphan: it is
    /// discarded and still reported `Complete`, so one stray message
    /// never stalls the receive pipeline. Incomplete and
    /// unknown-command results are returned unchanged for the
    /// transport to act on; nothing is consumed here.
    pub fn parse_reply(&self, buf: &[u8]) -> FrameStatus {
        let status = frame_message(self.replies, buf);
        let FrameStatus::Complete { len } = status else {
            return status;
        };
        let message = Bytes::copy_from_slice(&buf[..len]);

        let mut state = lock(&self.sync.state);
        loop {
            if state.parked && state.reply.is_none() {
                state.reply = Some(message);
                self.sync.caller_resume.notify_one();
                // Yield until the caller has taken the buffer, so the
                // next message cannot overwrite it mid-read.
                while state.reply.is_some() {
                    state = self
                        .sync
                        .parser_resume
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                trace!(id = buf[0], len, "reply handed off");
                return status;
            }
            if !state.expecting {
                // Stale or duplicate answer; success so the transport
                // discards it and keeps receiving.
                debug!(id = buf[0], len, "orphan reply discarded");
                return status;
            }
            // A caller armed the flag but has not parked yet; wait for
            // it to park or withdraw.
            state = self
                .sync
                .parser_resume
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mutably borrow the transport (requires exclusive channel
    /// access, so no call can be in flight).
    pub fn transport_mut(&mut self) -> &mut T {
        self.transport.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume the channel and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks "a caller is awaiting a reply" for the lifetime of one call.
///
/// Dropping clears the flag and nudges the receive thread, so every
/// exit path — including timeout and unwinding — leaves the channel
/// in a state the receive side can resolve.
struct ExpectGuard<'a> {
    sync: &'a Sync,
}

impl<'a> ExpectGuard<'a> {
    fn arm(sync: &'a Sync) -> Self {
        lock(&sync.state).expecting = true;
        Self { sync }
    }
}

impl Drop for ExpectGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.sync.state);
        state.expecting = false;
        state.parked = false;
        drop(state);
        self.sync.parser_resume.notify_one();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoning panic elsewhere must not cascade across the channel
    // boundary; the protocol state itself stays consistent because
    // every mutation is a single flag or buffer swap.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

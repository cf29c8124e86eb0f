//! Wall-clock envelope decay.
//!
//! Voices decay on real time, not on samples rendered: the audio callback only
//! runs while the sink is pulling, but a struck note has to fade whether or not
//! anyone is listening. One background thread owns every pending decay and
//! sleeps until the earliest one is due.
//!
//! Jobs hold a `Weak` reference to their voice and the envelope generation
//! captured at trigger time. A job whose voice is gone, or whose generation has
//! been superseded by a newer strike, is dropped without writing anything.

use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};

use crate::config::DecaySchedule;
use crate::dsp::DecayStep;
use crate::error::{EngineError, Result};
use crate::synth::voice::VoiceState;

struct DecayJob {
    voice: Weak<VoiceState>,
    generation: u32,
    due: Instant,
    ticks: u32,
}

pub struct EnvelopeScheduler {
    tx: Option<Sender<DecayJob>>,
    worker: Option<JoinHandle<()>>,
    schedule: DecaySchedule,
}

impl EnvelopeScheduler {
    /// Start the decay thread.
    pub fn spawn(schedule: DecaySchedule, silence_threshold: f32) -> Result<Self> {
        let (tx, rx) = unbounded::<DecayJob>();

        let worker = thread::Builder::new()
            .name("steelpan-decay".into())
            .spawn(move || {
                log::debug!("envelope scheduler started");
                let mut jobs: Vec<DecayJob> = Vec::new();

                loop {
                    let received = match jobs.iter().map(|job| job.due).min() {
                        Some(due) => rx.recv_deadline(due),
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };

                    match received {
                        Ok(job) => {
                            // A new strike replaces whatever decay the voice had
                            jobs.retain(|pending| !pending.voice.ptr_eq(&job.voice));
                            jobs.push(job);
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let now = Instant::now();
                    jobs.retain_mut(|job| {
                        if job.due > now {
                            return true;
                        }
                        advance(job, &schedule, silence_threshold)
                    });
                }

                log::debug!(
                    "envelope scheduler stopped with {} pending decays",
                    jobs.len()
                );
            })
            .map_err(|e| EngineError::Scheduler(format!("failed to spawn decay thread: {}", e)))?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            schedule,
        })
    }

    /// Begin decaying `voice` on behalf of the strike that produced `generation`.
    pub fn schedule(&self, voice: &Arc<VoiceState>, generation: u32) {
        let Some(tx) = &self.tx else {
            log::warn!("decay requested after scheduler shutdown");
            return;
        };

        let job = DecayJob {
            voice: Arc::downgrade(voice),
            generation,
            due: Instant::now() + self.schedule.hold,
            ticks: 0,
        };
        if tx.send(job).is_err() {
            log::warn!("envelope scheduler thread is gone; voice will not decay");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop the decay thread and wait for it. Pending decays are abandoned.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("envelope scheduler thread panicked");
            }
        }
    }
}

impl Drop for EnvelopeScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run one due step of `job`. Returns whether the job stays scheduled.
fn advance(job: &mut DecayJob, schedule: &DecaySchedule, silence_threshold: f32) -> bool {
    let Some(voice) = job.voice.upgrade() else {
        return false;
    };

    if job.ticks >= schedule.max_ticks {
        voice.envelope().silence(job.generation);
        return false;
    }

    match voice
        .envelope()
        .decay_step(job.generation, schedule.factor, silence_threshold)
    {
        DecayStep::Decayed(_) => {
            job.ticks += 1;
            job.due += schedule.tick;
            true
        }
        DecayStep::Finished | DecayStep::Superseded => false,
    }
}

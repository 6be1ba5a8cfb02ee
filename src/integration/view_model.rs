//! Camera view-model: permission, capture lifecycle and the processing loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::detection::Rect;
use crate::pose::JointSample;

use super::error::SessionError;
use super::pipeline::FramePipeline;
use super::source::{FrameSource, ObjectRecognizer, PermissionAuthority, PoseEstimator};
use super::state::PublishedState;

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
    outcome: oneshot::Receiver<Result<u64, SessionError>>,
}

/// Owns the capture session and exposes the published state.
///
/// Frames are processed on a blocking task, one at a time, and every
/// completed pass replaces the published snapshot.
pub struct CameraViewModel {
    state: PublishedState,
    worker: Option<Worker>,
}

impl Default for CameraViewModel {
    fn default() -> Self {
        Self::new(PublishedState::new())
    }
}

impl CameraViewModel {
    pub fn new(state: PublishedState) -> Self {
        Self {
            state,
            worker: None,
        }
    }

    pub fn state(&self) -> &PublishedState {
        &self.state
    }

    pub fn joints(&self) -> JointSample {
        self.state.latest_joints()
    }

    pub fn balls(&self) -> Vec<Rect> {
        self.state.latest_balls()
    }

    pub fn camera_permission(&self) -> Option<bool> {
        self.state.camera_permission()
    }

    /// Ask `authority` for camera access and wait for the answer.
    ///
    /// The decision is stored once; asking again returns the stored answer
    /// without contacting the authority.
    pub async fn request_camera_access<A>(&self, authority: &A) -> Result<bool, SessionError>
    where
        A: PermissionAuthority + ?Sized,
    {
        if let Some(granted) = self.state.camera_permission() {
            return Ok(granted);
        }

        let (tx, rx) = oneshot::channel();
        authority.request_access(tx);
        let granted = rx.await.map_err(|_| SessionError::PermissionChannelClosed)?;

        if self.state.set_camera_permission(granted) {
            info!(granted, "camera permission decided");
        }
        Ok(self.state.camera_permission().unwrap_or(granted))
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Start capturing and processing frames in the background.
    ///
    /// The pipeline publishes into this view-model's state, whatever state
    /// it was built with. If a previous session ended on its own with an
    /// error, that error is returned and the session slot is cleared.
    /// Must be called from within a tokio runtime.
    pub fn start<S, P, O>(
        &mut self,
        mut source: S,
        mut pipeline: FramePipeline<P, O>,
    ) -> Result<(), SessionError>
    where
        S: FrameSource + 'static,
        P: PoseEstimator + 'static,
        O: ObjectRecognizer + 'static,
    {
        if self.state.camera_permission() != Some(true) {
            return Err(SessionError::PermissionDenied);
        }
        self.reap_finished()?;
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        source
            .start()
            .map_err(|e| SessionError::Capture(Box::new(e)))?;
        info!("capture session started");

        pipeline.set_state(self.state.clone());
        let stop = Arc::new(AtomicBool::new(false));
        let (outcome_tx, outcome) = oneshot::channel();
        let handle = runtime.spawn_blocking({
            let stop = stop.clone();
            move || {
                let _ = outcome_tx.send(run_capture_loop(source, pipeline, &stop));
            }
        });
        self.worker = Some(Worker {
            stop,
            handle,
            outcome,
        });
        Ok(())
    }

    /// Collect the result of a session that ended on its own.
    fn reap_finished(&mut self) -> Result<(), SessionError> {
        let Some(mut worker) = self.worker.take_if(|w| w.handle.is_finished()) else {
            return Ok(());
        };
        match worker.outcome.try_recv() {
            Ok(Ok(processed)) => {
                info!(processed, "previous capture session finished");
                Ok(())
            }
            Ok(Err(err)) => {
                warn!(error = %err, "previous capture session failed");
                Err(err)
            }
            Err(_) => Err(SessionError::WorkerPanicked),
        }
    }

    /// Stop the session and wait for the loop to finish.
    ///
    /// Returns the number of frames processed.
    pub async fn stop(&mut self) -> Result<u64, SessionError> {
        let worker = self.worker.take().ok_or(SessionError::NotRunning)?;
        worker.stop.store(true, Ordering::Release);
        Self::join_worker(worker).await
    }

    /// Wait for the loop to end on its own, e.g. when the source runs dry.
    pub async fn wait(&mut self) -> Result<u64, SessionError> {
        let worker = self.worker.take().ok_or(SessionError::NotRunning)?;
        Self::join_worker(worker).await
    }

    async fn join_worker(worker: Worker) -> Result<u64, SessionError> {
        worker
            .handle
            .await
            .map_err(|_| SessionError::WorkerPanicked)?;
        let processed = worker
            .outcome
            .await
            .map_err(|_| SessionError::WorkerPanicked)??;
        info!(processed, "capture session stopped");
        Ok(processed)
    }
}

impl Drop for CameraViewModel {
    fn drop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.stop.store(true, Ordering::Release);
        }
    }
}

fn run_capture_loop<S, P, O>(
    mut source: S,
    mut pipeline: FramePipeline<P, O>,
    stop: &AtomicBool,
) -> Result<u64, SessionError>
where
    S: FrameSource,
    P: PoseEstimator,
    O: ObjectRecognizer,
{
    let mut processed = 0u64;
    let result = loop {
        if stop.load(Ordering::Acquire) {
            break Ok(());
        }
        match source.next_frame() {
            Ok(Some(frame)) => match pipeline.process_frame(&frame) {
                Ok(_) => processed += 1,
                Err(err) => warn!(error = %err, frame_id = frame.id, "dropping frame"),
            },
            Ok(None) => {
                info!("capture source exhausted");
                break Ok(());
            }
            Err(err) => break Err(SessionError::Capture(Box::new(err))),
        }
    };
    source.stop();
    result.map(|()| processed)
}

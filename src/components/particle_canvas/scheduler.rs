//! Frame-rate capped animation loop and engine lifecycle.
//!
//! The loop is a self-rescheduling frame callback. [`FrameScheduler`] holds
//! the pending frame handle and the lifecycle phase; the host environment
//! (the browser, or a test double) is reached through [`FrameHost`].

use crate::error::EngineError;

/// Opaque handle returned by the host when a frame is requested.
pub type FrameHandle = i32;

/// Host services the scheduler needs.
pub trait FrameHost {
	/// Schedules one frame callback.
	fn request_frame(&mut self) -> Result<FrameHandle, EngineError>;
	/// Cancels a frame that has not fired yet.
	fn cancel_frame(&mut self, handle: FrameHandle);
	/// Removes every event listener registered for this engine.
	fn detach_listeners(&mut self);
}

/// Milliseconds between executed frames for a frame-rate cap.
pub fn frame_interval(target_fps: u32) -> f64 {
	1000.0 / target_fps.max(1) as f64
}

/// Whether enough time has passed since the last executed frame.
///
/// The very first tick always runs.
pub fn should_run(last_frame: Option<f64>, now: f64, interval: f64) -> bool {
	match last_frame {
		None => true,
		Some(last) => now - last >= interval,
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Uninitialized,
	Running,
	/// Terminal; no more frames are requested.
	Stopped,
}

/// What a scheduler tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
	/// Update and render ran.
	Ran,
	/// Too soon since the last frame; rescheduled without work.
	Skipped,
	/// The scheduler is not running; nothing happened.
	Idle,
}

pub struct FrameScheduler<H: FrameHost> {
	host: H,
	phase: Phase,
	pending: Option<FrameHandle>,
	last_frame: Option<f64>,
	interval: f64,
}

impl<H: FrameHost> FrameScheduler<H> {
	pub fn new(host: H, target_fps: u32) -> Self {
		Self {
			host,
			phase: Phase::Uninitialized,
			pending: None,
			last_frame: None,
			interval: frame_interval(target_fps),
		}
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn set_target_fps(&mut self, target_fps: u32) {
		self.interval = frame_interval(target_fps);
	}

	/// Requests the first frame. Only valid from `Uninitialized`.
	pub fn start(&mut self) -> Result<(), EngineError> {
		if self.phase != Phase::Uninitialized {
			return Ok(());
		}
		self.pending = Some(self.host.request_frame()?);
		self.phase = Phase::Running;
		Ok(())
	}

	/// Handles one frame callback at host time `now` (ms).
	///
	/// Runs `work` if the frame interval has elapsed, then requests the next
	/// frame. An error from `work` stops the scheduler and is returned.
	pub fn on_tick<F>(&mut self, now: f64, work: F) -> Result<Tick, EngineError>
	where
		F: FnOnce() -> Result<(), EngineError>,
	{
		if self.phase != Phase::Running {
			return Ok(Tick::Idle);
		}
		// the frame that fired is no longer cancellable
		self.pending = None;

		let tick = if should_run(self.last_frame, now, self.interval) {
			self.last_frame = Some(now);
			if let Err(e) = work() {
				self.stop();
				return Err(e);
			}
			Tick::Ran
		} else {
			Tick::Skipped
		};

		match self.host.request_frame() {
			Ok(handle) => self.pending = Some(handle),
			Err(e) => {
				self.stop();
				return Err(e);
			}
		}
		Ok(tick)
	}

	/// Cancels the pending frame and detaches listeners. Idempotent.
	///
	/// Also valid before [`start`](Self::start), to release listeners
	/// registered during a mount that failed part way.
	pub fn stop(&mut self) {
		if self.phase == Phase::Stopped {
			return;
		}
		if let Some(handle) = self.pending.take() {
			self.host.cancel_frame(handle);
		}
		self.host.detach_listeners();
		self.phase = Phase::Stopped;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct CountingHost {
		next: FrameHandle,
		requested: Vec<FrameHandle>,
		cancelled: Vec<FrameHandle>,
		detached: usize,
		fail_requests: bool,
	}

	impl FrameHost for CountingHost {
		fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
			if self.fail_requests {
				return Err(EngineError::Host("no frames".into()));
			}
			self.next += 1;
			self.requested.push(self.next);
			Ok(self.next)
		}

		fn cancel_frame(&mut self, handle: FrameHandle) {
			self.cancelled.push(handle);
		}

		fn detach_listeners(&mut self) {
			self.detached += 1;
		}
	}

	#[test]
	fn throttle_is_pure_interval_check() {
		let interval = frame_interval(30);
		assert!((interval - 33.333).abs() < 0.001);
		assert!(should_run(None, 0.0, interval));
		assert!(!should_run(Some(100.0), 120.0, interval));
		assert!(should_run(Some(100.0), 100.0 + interval, interval));
		assert!(should_run(Some(100.0), 200.0, interval));
		assert_eq!(frame_interval(0), 1000.0);
	}

	#[test]
	fn mount_then_unmount_cancels_once_and_never_works() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		assert_eq!(scheduler.phase(), Phase::Uninitialized);
		scheduler.start().unwrap();
		assert_eq!(scheduler.phase(), Phase::Running);
		scheduler.stop();
		scheduler.stop();

		let mut work_calls = 0;
		let tick = scheduler
			.on_tick(1000.0, || {
				work_calls += 1;
				Ok(())
			})
			.unwrap();

		assert_eq!(tick, Tick::Idle);
		assert_eq!(work_calls, 0);
		assert_eq!(scheduler.phase(), Phase::Stopped);
		assert_eq!(scheduler.host().cancelled, vec![1]);
		assert_eq!(scheduler.host().detached, 1);
		assert_eq!(scheduler.host().requested.len(), 1);
	}

	#[test]
	fn ticks_inside_the_interval_are_skipped_but_rescheduled() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		scheduler.start().unwrap();
		let mut runs = 0;
		let mut tick = |scheduler: &mut FrameScheduler<CountingHost>, now: f64| {
			scheduler
				.on_tick(now, || {
					runs += 1;
					Ok(())
				})
				.unwrap()
		};

		assert_eq!(tick(&mut scheduler, 0.0), Tick::Ran);
		assert_eq!(tick(&mut scheduler, 16.7), Tick::Skipped);
		assert_eq!(tick(&mut scheduler, 33.4), Tick::Ran);
		assert_eq!(tick(&mut scheduler, 50.0), Tick::Skipped);
		assert_eq!(tick(&mut scheduler, 66.8), Tick::Ran);
		drop(tick);

		assert_eq!(runs, 3);
		// one request from start plus one per tick
		assert_eq!(scheduler.host().requested.len(), 6);
	}

	#[test]
	fn unmount_cancels_the_latest_pending_frame() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		scheduler.start().unwrap();
		scheduler.on_tick(0.0, || Ok(())).unwrap();
		scheduler.on_tick(40.0, || Ok(())).unwrap();
		scheduler.stop();
		assert_eq!(scheduler.host().cancelled, vec![3]);
		assert_eq!(scheduler.host().detached, 1);
	}

	#[test]
	fn failing_frame_stops_the_engine() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		scheduler.start().unwrap();
		let result = scheduler.on_tick(0.0, || Err(EngineError::Host("gradient".into())));
		assert!(result.is_err());
		assert_eq!(scheduler.phase(), Phase::Stopped);
		// the fired frame was not pending any more, so nothing to cancel
		assert!(scheduler.host().cancelled.is_empty());
		assert_eq!(scheduler.host().detached, 1);
		assert_eq!(scheduler.host().requested.len(), 1);

		let mut ran = false;
		let tick = scheduler
			.on_tick(100.0, || {
				ran = true;
				Ok(())
			})
			.unwrap();
		assert_eq!(tick, Tick::Idle);
		assert!(!ran);
	}

	#[test]
	fn start_failure_leaves_engine_unstarted() {
		let host = CountingHost {
			fail_requests: true,
			..CountingHost::default()
		};
		let mut scheduler = FrameScheduler::new(host, 30);
		assert!(scheduler.start().is_err());
		assert_eq!(scheduler.phase(), Phase::Uninitialized);
	}

	#[test]
	fn start_is_only_honoured_once() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		scheduler.start().unwrap();
		scheduler.start().unwrap();
		assert_eq!(scheduler.host().requested.len(), 1);
	}

	#[test]
	fn stop_before_start_releases_listeners() {
		let mut scheduler = FrameScheduler::new(CountingHost::default(), 30);
		scheduler.stop();
		assert_eq!(scheduler.phase(), Phase::Stopped);
		assert_eq!(scheduler.host().detached, 1);
		assert!(scheduler.host().cancelled.is_empty());
		assert!(scheduler.host().requested.is_empty());

		// a stopped scheduler never starts
		scheduler.start().unwrap();
		assert!(scheduler.host().requested.is_empty());
	}
}

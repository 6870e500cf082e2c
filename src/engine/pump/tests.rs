use std::sync::Arc;

use dpi::PhysicalSize;

use super::{FramePump, FrameRequest, PresentationState};
use crate::engine::dispatch::{MainThreadQueue, Task};
use crate::engine::error::{PresentError, ResizeError, SurfaceError};
use crate::engine::surface::{
    DrawTarget, FlipConvention, FrameRenderer, PresentSurface, SwapCompletion,
};

#[derive(Default)]
struct FakeSurface {
    outstanding: Vec<SwapCompletion>,
    max_outstanding: usize,
    swaps: usize,
    fail_resize: bool,
    fail_swap: bool,
    resized_to: Vec<PhysicalSize<u32>>,
}

impl PresentSurface for FakeSurface {
    fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<(), SurfaceError> {
        if self.fail_resize {
            return Err(SurfaceError::ResizeFailed(-1));
        }
        self.resized_to.push(size);
        Ok(())
    }

    fn swap_buffers(&mut self, completion: SwapCompletion) -> Result<(), SurfaceError> {
        if self.fail_swap {
            return Err(SurfaceError::SwapFailed(-2));
        }
        self.swaps += 1;
        self.outstanding.push(completion);
        self.max_outstanding = self.max_outstanding.max(self.outstanding.len());
        Ok(())
    }
}

#[derive(Default)]
struct FakeRenderer {
    targets: Vec<DrawTarget>,
}

impl FrameRenderer for FakeRenderer {
    fn draw_current_frame(&mut self, target: DrawTarget) {
        self.targets.push(target);
    }
}

type Pump = FramePump<FakeSurface, FakeRenderer>;

fn pump() -> (Pump, Arc<MainThreadQueue>) {
    let queue = MainThreadQueue::new(Box::new(|| {}));
    let pump = FramePump::new(
        FakeSurface::default(),
        FakeRenderer::default(),
        queue.clone(),
        FlipConvention::TopDown,
    );
    (pump, queue)
}

/// Completes the oldest outstanding swap and runs the resulting main-thread work.
fn complete_one(pump: &mut Pump, queue: &MainThreadQueue) {
    let completion = pump.surface_mut().outstanding.remove(0);
    completion.complete();
    queue.drain(|task| {
        if let Task::PresentComplete(token) = task {
            pump.on_present_complete(token).unwrap();
        }
    });
}

fn ready(pump: &mut Pump) {
    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(640, 480)),
        Ok(FrameRequest::Presented)
    );
}

#[test]
fn requests_before_first_resize_issue_no_present() {
    let (mut pump, _queue) = pump();
    for _ in 0..5 {
        assert_eq!(pump.request_frame(), Ok(FrameRequest::NotReady));
    }
    assert_eq!(pump.surface().swaps, 0);
    assert_eq!(pump.snapshot(), PresentationState::default());
}

#[test]
fn resize_and_coalescing_scenario() {
    let (mut pump, queue) = pump();

    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(0, 0)),
        Err(ResizeError::Surface(SurfaceError::InvalidSize {
            width: 0,
            height: 0
        }))
    );
    assert_eq!(pump.request_frame(), Ok(FrameRequest::NotReady));
    assert_eq!(pump.surface().swaps, 0);

    ready(&mut pump);
    assert_eq!(pump.surface().swaps, 1);
    let state = pump.snapshot();
    assert!(state.surface_ready && state.painting && !state.pending_repaint);

    assert_eq!(pump.request_frame(), Ok(FrameRequest::Coalesced));
    assert!(pump.snapshot().pending_repaint);
    assert_eq!(pump.surface().outstanding.len(), 1);

    complete_one(&mut pump, &queue);
    assert_eq!(pump.surface().swaps, 2);
    assert_eq!(pump.surface().outstanding.len(), 1);
    let state = pump.snapshot();
    assert!(state.painting && !state.pending_repaint);
}

#[test]
fn rapid_fire_requests_keep_one_present_in_flight() {
    let (mut pump, _queue) = pump();
    ready(&mut pump);
    for _ in 0..100 {
        assert_eq!(pump.request_frame(), Ok(FrameRequest::Coalesced));
    }
    assert_eq!(pump.surface().outstanding.len(), 1);
    assert_eq!(pump.surface().swaps, 1);
    assert!(pump.snapshot().pending_repaint);
}

#[test]
fn coalescing_is_idempotent() {
    let (mut once, once_queue) = pump();
    ready(&mut once);
    once.request_frame().unwrap();
    complete_one(&mut once, &once_queue);
    complete_one(&mut once, &once_queue);

    let (mut many, many_queue) = pump();
    ready(&mut many);
    for _ in 0..7 {
        many.request_frame().unwrap();
    }
    complete_one(&mut many, &many_queue);
    complete_one(&mut many, &many_queue);

    assert_eq!(once.surface().swaps, 2);
    assert_eq!(many.surface().swaps, 2);
    assert_eq!(once.snapshot(), many.snapshot());
    assert!(!many.snapshot().painting);
}

#[test]
fn never_more_than_one_outstanding_present() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    for round in 0..50 {
        for _ in 0..(round % 4) {
            pump.request_frame().unwrap();
        }
        if !pump.surface().outstanding.is_empty() {
            complete_one(&mut pump, &queue);
        }
        assert!(pump.surface().outstanding.len() <= 1);
    }
    assert_eq!(pump.surface().max_outstanding, 1);
}

#[test]
fn completion_without_pending_repaint_goes_idle() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    complete_one(&mut pump, &queue);
    assert_eq!(pump.surface().swaps, 1);
    assert_eq!(pump.in_flight(), None);
    let state = pump.snapshot();
    assert!(!state.painting && !state.pending_repaint && state.surface_ready);

    assert_eq!(pump.request_frame(), Ok(FrameRequest::Presented));
}

#[test]
fn draws_top_down_at_current_size() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    complete_one(&mut pump, &queue);
    pump.on_surface_resized(PhysicalSize::new(320, 200)).unwrap();

    let targets = &pump.renderer().targets;
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[0].width, targets[0].height), (640, -480));
    assert_eq!((targets[1].width, targets[1].height), (320, -200));
    assert_eq!(pump.size(), PhysicalSize::new(320, 200));
}

#[test]
fn resize_while_painting_is_coalesced() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(800, 600)),
        Ok(FrameRequest::Coalesced)
    );
    assert_eq!(pump.surface().swaps, 1);

    complete_one(&mut pump, &queue);
    assert_eq!(pump.surface().swaps, 2);
    let last = pump.renderer().targets.last().copied().unwrap();
    assert_eq!((last.width, last.height), (800, -600));
}

#[test]
fn failed_resize_keeps_previous_state() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    complete_one(&mut pump, &queue);
    let before = pump.snapshot();

    pump.surface_mut().fail_resize = true;
    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(1024, 768)),
        Err(ResizeError::Surface(SurfaceError::ResizeFailed(-1)))
    );
    assert_eq!(pump.snapshot(), before);
    assert_eq!(pump.size(), PhysicalSize::new(640, 480));

    let (mut fresh, _) = self::pump();
    fresh.surface_mut().fail_resize = true;
    assert!(fresh.on_surface_resized(PhysicalSize::new(10, 10)).is_err());
    assert!(!fresh.snapshot().surface_ready);
}

#[test]
fn failed_swap_returns_pump_to_idle() {
    let (mut pump, _queue) = pump();
    pump.surface_mut().fail_swap = true;
    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(640, 480)),
        Err(ResizeError::Present(PresentError(SurfaceError::SwapFailed(-2))))
    );
    let state = pump.snapshot();
    assert!(state.surface_ready && !state.painting);

    assert_eq!(
        pump.request_frame(),
        Err(PresentError(SurfaceError::SwapFailed(-2)))
    );
    assert_eq!(pump.in_flight(), None);

    pump.surface_mut().fail_swap = false;
    assert_eq!(pump.request_frame(), Ok(FrameRequest::Presented));
}

#[test]
fn stale_completion_token_is_ignored() {
    let (mut pump, _queue) = pump();
    ready(&mut pump);
    pump.request_frame().unwrap();
    let token = pump.in_flight().unwrap();

    assert_eq!(pump.on_present_complete(token + 10), Ok(None));
    assert!(pump.snapshot().painting);
    assert_eq!(
        pump.on_present_complete(token),
        Ok(Some(FrameRequest::Presented))
    );
    assert_eq!(pump.on_present_complete(token), Ok(None));
}

#[test]
fn late_completion_after_teardown_is_ignored() {
    let (mut pump, queue) = pump();
    ready(&mut pump);
    pump.request_frame().unwrap();
    let token = pump.in_flight().unwrap();

    pump.teardown();
    queue.close();
    pump.surface_mut().outstanding.remove(0).complete();
    queue.drain(|_| panic!("closed queue must not run tasks"));

    assert_eq!(pump.on_present_complete(token), Ok(None));
    assert_eq!(pump.request_frame(), Ok(FrameRequest::NotReady));
    assert_eq!(
        pump.on_surface_resized(PhysicalSize::new(640, 480)),
        Ok(FrameRequest::NotReady)
    );
    assert_eq!(pump.surface().swaps, 1);
    let state = pump.snapshot();
    assert!(state.destroyed && !state.painting && !state.surface_ready);
}

#[test]
fn resize_applied_even_when_first_present_fails() {
    let (mut pump, _queue) = pump();
    pump.surface_mut().fail_swap = true;

    let err = pump
        .on_surface_resized(PhysicalSize::new(100, 50))
        .unwrap_err();
    assert!(matches!(err, ResizeError::Present(_)));
    assert_eq!(pump.surface().resized_to, vec![PhysicalSize::new(100, 50)]);
    assert_eq!(pump.size(), PhysicalSize::new(100, 50));
    assert_eq!(
        pump.snapshot(),
        PresentationState {
            surface_ready: true,
            ..PresentationState::default()
        }
    );
}

//! Dispense task
//!
//! Owns the tray stepper and the status LED. Runs the boot motor check,
//! then services dispense requests one at a time.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use pillbox_core::config::DispenserConfig;
use pillbox_core::dispense::{
    DispenseOrchestrator, DispenseOrigin, DispenseProgress, DispenseRequest, DispenseTiming,
};
use pillbox_core::display::renderer;

use crate::board::Stepper;
use crate::channels::{DisplayEvent, DISPENSE_REQUESTS, DISPENSING, DISPLAY_CHANNEL};

/// Dispense task - drives one cycle per request
#[embassy_executor::task]
pub async fn dispense_task(mut stepper: Stepper, mut led: Output<'static>, config: DispenserConfig) {
    info!("Dispense task started");

    let mut orchestrator = DispenseOrchestrator::new(DispenseTiming::from(&config));
    let step_interval = Duration::from_millis(config.motor.step_interval_ms as u64);

    info!("Running motor self-test ({} steps)", config.motor.self_test_steps);
    let self_test = DispenseRequest::self_test(config.motor.self_test_steps);
    run_cycle(&mut orchestrator, &mut stepper, &mut led, self_test, step_interval).await;
    info!("Motor self-test complete");

    loop {
        let request = DISPENSE_REQUESTS.receive().await;
        run_cycle(&mut orchestrator, &mut stepper, &mut led, request, step_interval).await;
    }
}

/// Run a cycle to completion, one poll per step interval
async fn run_cycle(
    orchestrator: &mut DispenseOrchestrator,
    stepper: &mut Stepper,
    led: &mut Output<'static>,
    request: DispenseRequest,
    step_interval: Duration,
) {
    // The self-test runs behind the boot screens
    let show_progress = request.origin != DispenseOrigin::SelfTest;
    let screen = renderer::dispensing(&request);

    info!(
        "Dispense begin: {} ({} doses, {:?})",
        request.name.as_str(),
        request.doses,
        request.target
    );

    match orchestrator.begin(request) {
        Ok(()) => {
            led.set_high();
            if show_progress {
                DISPLAY_CHANNEL.send(DisplayEvent::Show(screen)).await;
            }

            let mut ticker = Ticker::every(step_interval);
            loop {
                ticker.next().await;

                match orchestrator.poll(stepper, Instant::now().as_millis()) {
                    Ok(None) => {}
                    Ok(Some(DispenseProgress::Dwelling)) => {
                        info!("Dispense at target, dwelling");
                    }
                    Ok(Some(DispenseProgress::Returning)) => {
                        info!("Dispense returning to rest");
                        if show_progress {
                            DISPLAY_CHANNEL
                                .send(DisplayEvent::Show(renderer::returning()))
                                .await;
                        }
                    }
                    Ok(Some(DispenseProgress::Completed(done))) => {
                        info!(
                            "Dispense complete: {} ({} steps out, {} back)",
                            done.name.as_str(),
                            orchestrator.cycle().forward_steps(),
                            orchestrator.cycle().return_steps()
                        );
                        if show_progress {
                            DISPLAY_CHANNEL
                                .send(DisplayEvent::Show(renderer::at_rest()))
                                .await;
                        }
                        break;
                    }
                    Err(e) => match e {},
                }
            }

            led.set_low();
        }
        Err(e) => warn!("Dispense rejected: {:?}", e),
    }

    DISPENSING.store(false, Ordering::Release);
}

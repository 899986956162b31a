//! Headless demo driver
//!
//! Runs one full session without a renderer: holds the throttle, pumps
//! 60 fps frames through the simulation and logs the outcome. Useful for
//! watching the log output of a whole Title-to-Title cycle.

use gridfall::{Config, Control, Session, SessionEvent};

const FRAME: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut session = Session::new(Config::default());
    session.start();
    if let Some(input) = session.input_mut() {
        input.press(Control::Accelerate);
    }

    loop {
        session.frame(FRAME);

        let mut done = false;
        for event in session.drain_events() {
            match event {
                SessionEvent::Escaped => log::info!("escaped the grid"),
                SessionEvent::Dead => log::info!("wrecked"),
                SessionEvent::TimerElapsed => log::info!("time ran out"),
                SessionEvent::ReturnedToTitle => done = true,
            }
            if let (Some(vehicle), Some(countdown)) = (session.vehicle(), session.countdown()) {
                log::info!(
                    "at ({:.1}, {:.1}) with {countdown}s left",
                    vehicle.position.x,
                    vehicle.position.z
                );
            }
        }
        if done {
            break;
        }
    }
}

//! Drives a watch session against a simulated host over an in-memory pipe.
//!
//! Run with: `cargo run --example loopback`

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use varwatch::{ByteStream, MemoryStream, SessionConfig, WatchSession};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (device_end, mut host) = MemoryStream::pair();
    let mut session = WatchSession::with_config(
        device_end,
        SessionConfig {
            capacity: 8,
            slots_per_tick: 2,
            rx_buffer_size: 32,
        },
    );

    let rpm = Rc::new(Cell::new(1800u32));
    let setpoint = Rc::new(Cell::new(2000u32));
    let armed = Rc::new(Cell::new(false));

    session.text("motor controller").unwrap();
    session.register("rpm", &rpm, true).unwrap();
    session.register("setpoint", &setpoint, false).unwrap();
    session.register("armed", &armed, false).unwrap();
    session.complete_first_pass();

    let mut frame = String::new();
    for tick in 0..32 {
        // The caller's own loop keeps mutating its values...
        rpm.set(1800 + tick * 7);

        // ...and repeats the registration sequence before servicing.
        session.text("motor controller").unwrap();
        session.register("rpm", &rpm, true).unwrap();
        session.register("setpoint", &setpoint, false).unwrap();
        session.register("armed", &armed, false).unwrap();
        session.service().unwrap();

        // The host drains outbound bytes as they trickle in.
        while let Some(byte) = host.read_byte() {
            frame.push(byte as char);
            if byte == b'>' {
                info!(%frame, "host received a full frame");
                frame.clear();
            }
        }

        // Mid-run, the host edits the setpoint and arms the motor.
        if tick == 10 {
            host.write(b"<L:2:2400>").unwrap();
            host.write(b"<b:3:1>").unwrap();
        }
    }

    info!(
        setpoint = setpoint.get(),
        armed = armed.get(),
        "host edits applied through the registry"
    );
}

//! The host keyboard-polling task the concurrency model calls for: a thread
//! separate from the hart loop that reads stdin and deposits bytes into the
//! shared [`InputBuffer`] one at a time.

use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rv32ima_core::soc::InputBuffer;

/// Spawns the stdin-polling thread. It blocks on `read` (a guest with no
/// input to give it just never gets a byte) and retries `offer` with a short
/// backoff when the buffer is still occupied by an unconsumed byte.
pub fn spawn_stdin_poller(input: Arc<InputBuffer>) {
    let _handle = thread::spawn(move || {
        let mut byte = [0u8; 1];
        let mut stdin = std::io::stdin();
        loop {
            match stdin.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    while !input.offer(byte[0]) {
                        thread::sleep(Duration::from_micros(200));
                    }
                }
                Err(_) => break,
            }
        }
    });
}

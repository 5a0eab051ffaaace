//! # CoopOS Example Firmware
//!
//! Blinks four LEDs on GPIOA of an STM32F103 at different rates, one
//! periodic task per LED:
//!
//! | Priority | Pin | Period  |
//! |----------|-----|---------|
//! | 0        | PA0 | 500 ms  |
//! | 1        | PA1 | 1000 ms |
//! | 2        | PA2 | 2000 ms |
//! | 3        | PA3 | 4000 ms |
//!
//! SysTick drives `tick()` at `TICK_RATE_HZ`; the main loop dispatches and
//! sleeps until the next interrupt whenever a pass ran nothing.

#![no_std]
#![no_main]

use cortex_m_rt::{entry, exception};
use panic_halt as _;

#[cfg(feature = "defmt")]
use defmt_rtt as _;

use coopos::arch::cortex_m as port;
use coopos::config::{self, MAX_TASKS, TICK_RATE_HZ};
use coopos::SharedScheduler;

// ---------------------------------------------------------------------------
// Task arguments
// ---------------------------------------------------------------------------

/// Argument of the blink task: which pin to toggle and how often.
struct Led {
    pin: u8,
    period_ms: u32,
}

static LEDS: [Led; MAX_TASKS] = [
    Led { pin: 0, period_ms: 500 },
    Led { pin: 1, period_ms: 1000 },
    Led { pin: 2, period_ms: 2000 },
    Led { pin: 3, period_ms: 4000 },
];

static SCHEDULER: SharedScheduler<&'static Led, MAX_TASKS> = SharedScheduler::new();

// ---------------------------------------------------------------------------
// GPIOA (STM32F1 register layout)
// ---------------------------------------------------------------------------

mod gpio {
    const RCC_APB2ENR: *mut u32 = 0x4002_1018 as *mut u32;
    const IOPAEN: u32 = 1 << 2;

    const GPIOA_CRL: *mut u32 = 0x4001_0800 as *mut u32;
    const GPIOA_ODR: *const u32 = 0x4001_080C as *const u32;
    const GPIOA_BSRR: *mut u32 = 0x4001_0810 as *mut u32;

    /// CNF = 01 (open-drain), MODE = 10 (output, 2 MHz)
    const OUTPUT_OPEN_DRAIN: u32 = 0b0110;

    pub fn enable_port_a() {
        // SAFETY: RCC_APB2ENR is a valid, always-mapped register; only
        // touched during single-threaded startup.
        unsafe {
            let val = core::ptr::read_volatile(RCC_APB2ENR);
            core::ptr::write_volatile(RCC_APB2ENR, val | IOPAEN);
        }
    }

    /// Configure `pin` (0..=7) as an open-drain output driven low.
    pub fn configure_output(pin: u8) {
        let shift = u32::from(pin) * 4;
        // SAFETY: GPIOA is clocked by `enable_port_a()`; startup only.
        unsafe {
            let crl = core::ptr::read_volatile(GPIOA_CRL);
            let crl = (crl & !(0xF << shift)) | (OUTPUT_OPEN_DRAIN << shift);
            core::ptr::write_volatile(GPIOA_CRL, crl);
            core::ptr::write_volatile(GPIOA_BSRR, 1 << (u32::from(pin) + 16));
        }
    }

    pub fn toggle(pin: u8) {
        let mask = 1u32 << pin;
        // SAFETY: BSRR writes are atomic per pin; ODR is only read.
        unsafe {
            if core::ptr::read_volatile(GPIOA_ODR) & mask != 0 {
                core::ptr::write_volatile(GPIOA_BSRR, mask << 16);
            } else {
                core::ptr::write_volatile(GPIOA_BSRR, mask);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn toggle_led(led: &'static Led) {
    gpio::toggle(led.pin);
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    gpio::enable_port_a();
    SCHEDULER.initialize();

    for (priority, led) in LEDS.iter().enumerate() {
        gpio::configure_output(led.pin);
        SCHEDULER
            .register(
                Some(toggle_led),
                led,
                priority,
                config::ms_to_ticks(led.period_ms),
                0,
            )
            .expect("Failed to register blink task");
    }

    port::set_interrupt_priorities(&mut cp.SCB);
    port::configure_systick(&mut cp.SYST, TICK_RATE_HZ).expect("Invalid tick rate");

    loop {
        if SCHEDULER.dispatch() == 0 {
            // A tick landing right before this costs at most one tick of latency
            port::wait_for_interrupt();
        }
    }
}

#[exception]
fn SysTick() {
    SCHEDULER.tick();
}

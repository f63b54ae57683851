//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer/channel that drives the PWM output using raw
//! ESP-IDF sys calls, and exposes the frequency/duty register writes the
//! [`PwmDriver`](super::pwm::PwmDriver) needs.  GPIO for the PIR and the
//! ultrasonic ranger is owned by `esp-idf-hal` pin drivers built in `main`.
//!
//! On host targets every function is a no-op simulation stub.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::error::ActuatorError;
use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::pins;

/// LEDC duty resolution in bits.  10 bits keeps 20 kHz within the
/// 80 MHz APB clock budget (20 000 × 2¹⁰ < 80 M).
pub const LEDC_DUTY_BITS: u32 = 10;

/// Scale a 16-bit duty down to the LEDC resolution.
pub fn duty_u16_to_ledc(duty: u16) -> u32 {
    u32::from(duty) >> (16 - LEDC_DUTY_BITS)
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(initial_freq_hz: u32) -> Result<()> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe { init_ledc(initial_freq_hz)? };
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_initial_freq_hz: u32) -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(freq_hz: u32) -> core::result::Result<(), ActuatorError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::TimerConfigFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::PWM_OUT_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::ChannelConfigFailed(ret));
    }

    info!(
        "hw_init: LEDC configured (out=GPIO{}, {} Hz, {}-bit)",
        pins::PWM_OUT_GPIO,
        freq_hz,
        LEDC_DUTY_BITS
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn pwm_set_frequency(freq_hz: u32) {
    // SAFETY: timer 0 was configured in init_ledc(); only the main loop
    // reprograms it.
    let ret = unsafe {
        ledc_set_freq(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            ledc_timer_t_LEDC_TIMER_0,
            freq_hz,
        )
    };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: set frequency {} Hz failed (rc={})", freq_hz, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_set_frequency(_freq_hz: u32) {}

#[cfg(target_os = "espidf")]
pub fn pwm_set_duty(duty_u16: u16) {
    // SAFETY: channel 0 was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            ledc_channel_t_LEDC_CHANNEL_0,
            duty_u16_to_ledc(duty_u16),
        );
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_set_duty(_duty_u16: u16) {}

/// Stop the channel and park the pin LOW.
#[cfg(target_os = "espidf")]
pub fn pwm_release() {
    // SAFETY: channel 0 was configured in init_ledc().
    unsafe {
        ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0, 0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_release() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_init_is_a_no_op() {
        assert_eq!(init_peripherals(1_000), Ok(()));
    }

    #[test]
    fn duty_scaling_keeps_endpoints() {
        assert_eq!(duty_u16_to_ledc(0), 0);
        assert_eq!(duty_u16_to_ledc(u16::MAX), (1 << LEDC_DUTY_BITS) - 1);
        assert_eq!(duty_u16_to_ledc(32_768), 1 << (LEDC_DUTY_BITS - 1));
    }
}

//! Wake-up mode configuration and its 25-bit register encoding.

/// Operation mode `[8:7]`. Only wake-up mode is driven by this crate.
const OPERATION_MODE_WAKE_UP: u32 = 2;
/// Signal source `[6:5]`: band-pass filtered pyro signal.
const SIGNAL_SOURCE_BPF: u32 = 0;
/// Reserved `[4:3]`, must be 2.
const RESERVED_1: u32 = 2;
/// Reserved `[1]`, must be 0.
const RESERVED_2: u32 = 0;

/// High-pass filter cut-off of the pyro signal chain.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HpfCutoff {
    /// 0.4 Hz. A good starting point for long distance detection.
    #[default]
    LongDistance = 0,
    /// 0.2 Hz.
    ShortDistance = 1,
}

/// How pulses above the threshold are counted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseDetectionMode {
    /// Pulses only count when the band-pass signal changed sign in between. More robust against
    /// false triggers, less sensitive to small motion at long range.
    #[default]
    WithSignChange = 0,
    /// No zero crossing required.
    WithoutSignChange = 1,
}

/// Tunable fields of the wake-up mode configuration.
///
/// Fields wider than their register slot are masked when the register is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PirConfig {
    /// Detection threshold on the band-pass filtered value, 8 bits. Lower means longer range
    /// and more false triggers.
    pub threshold: u8,
    /// Blind time after the host resets DIRECT LINK, 4 bits, `0.5 s + value * 0.5 s`.
    pub blind_time: u8,
    /// Pulses above threshold needed to raise an alarm, 2 bits, `1 + value`.
    pub pulse_counter: u8,
    /// Moving window the pulses are counted in, 2 bits, `2 s + value * 2 s`.
    pub window_time: u8,
    pub hpf_cutoff: HpfCutoff,
    pub pulse_detection_mode: PulseDetectionMode,
}

impl Default for PirConfig {
    fn default() -> Self {
        Self {
            threshold: 24,
            blind_time: 2,
            pulse_counter: 2,
            window_time: 3,
            hpf_cutoff: HpfCutoff::LongDistance,
            pulse_detection_mode: PulseDetectionMode::WithSignChange,
        }
    }
}

impl PirConfig {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_blind_time(mut self, blind_time: u8) -> Self {
        self.blind_time = blind_time;
        self
    }

    pub fn with_pulse_counter(mut self, pulse_counter: u8) -> Self {
        self.pulse_counter = pulse_counter;
        self
    }

    pub fn with_window_time(mut self, window_time: u8) -> Self {
        self.window_time = window_time;
        self
    }

    pub fn with_hpf_cutoff(mut self, hpf_cutoff: HpfCutoff) -> Self {
        self.hpf_cutoff = hpf_cutoff;
        self
    }

    pub fn with_pulse_detection_mode(mut self, mode: PulseDetectionMode) -> Self {
        self.pulse_detection_mode = mode;
        self
    }

    /// Blind time in milliseconds, as applied by the sensor.
    pub fn blind_time_ms(&self) -> u32 {
        500 + u32::from(self.blind_time & 0x0f) * 500
    }

    /// Number of pulses above threshold that trigger an alarm.
    pub fn pulses_required(&self) -> u8 {
        1 + (self.pulse_counter & 0x03)
    }

    /// Window time in seconds.
    pub fn window_time_s(&self) -> u32 {
        2 + u32::from(self.window_time & 0x03) * 2
    }

    /// Assembles the register that is clocked out to the sensor.
    pub fn register(&self) -> ConfigurationRegister {
        ConfigurationRegister::from(self)
    }
}

/// The 25-bit configuration word, bit 24 is sent first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigurationRegister(u32);

impl ConfigurationRegister {
    /// Number of bits clocked out on SERIAL IN.
    pub const BITS: u32 = 25;

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Value of bit `index`, counted from the LSB.
    pub fn bit(&self, index: u32) -> bool {
        (self.0 >> index) & 1 != 0
    }

    /// Bits in transmission order, MSB first.
    pub fn msb_first(self) -> impl Iterator<Item = bool> {
        (0..Self::BITS).rev().map(move |i| self.bit(i))
    }
}

impl From<&PirConfig> for ConfigurationRegister {
    fn from(config: &PirConfig) -> Self {
        let mut reg = 0u32;
        reg |= (u32::from(config.threshold) & 0xff) << 17;
        reg |= (u32::from(config.blind_time) & 0x0f) << 13;
        reg |= (u32::from(config.pulse_counter) & 0x03) << 11;
        reg |= (u32::from(config.window_time) & 0x03) << 9;
        reg |= (OPERATION_MODE_WAKE_UP & 0x03) << 7;
        reg |= (SIGNAL_SOURCE_BPF & 0x03) << 5;
        reg |= (RESERVED_1 & 0x03) << 3;
        reg |= (config.hpf_cutoff as u32 & 0x01) << 2;
        reg |= (RESERVED_2 & 0x01) << 1;
        reg |= config.pulse_detection_mode as u32 & 0x01;
        ConfigurationRegister(reg)
    }
}

impl From<ConfigurationRegister> for u32 {
    fn from(reg: ConfigurationRegister) -> u32 {
        reg.0
    }
}

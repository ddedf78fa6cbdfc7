use embassy_stm32::rcc::*;
use embassy_stm32::time::Hertz as TimeHertz;
use embassy_stm32::usart::Config as UsartConfig;
use embassy_stm32::Config;

// ── Pin map ───────────────────────────────────────────────────────────────────
//  GPS receiver   USART3  RX=PB11  TX=PB10  (DMA1_CH1 / DMA1_CH3)
//  Host link      UART4   TX=PA0   RX=PA1   (DMA1_CH4 / DMA1_CH2), TX only in use
//  Heartbeat LED  PC13

/// GPS module output rate as shipped.
pub const GPS_BAUD: u32 = 38_400;
/// Host terminal runs at the same rate as the receiver.
pub const HOST_BAUD: u32 = 38_400;

pub struct Board {
    pub p: embassy_stm32::Peripherals,
}

impl Board {
    /// 8 MHz crystal → 168 MHz SYSCLK. No USB, so PLLQ stays off.
    pub fn init() -> Self {
        let mut config = Config::default();
        config.rcc.hse = Some(Hse {
            freq: TimeHertz(8_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL168,
            divp: Some(PllPDiv::DIV2),
            divq: None,
            divr: None,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;

        Self {
            p: embassy_stm32::init(config),
        }
    }
}

/// 8N1 at `baudrate`.
pub fn serial_config(baudrate: u32) -> UsartConfig {
    let mut config = UsartConfig::default();
    config.baudrate = baudrate;
    config
}

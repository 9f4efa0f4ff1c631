pub struct Cmd;
#[allow(dead_code)]
impl Cmd {
    pub const COLUMN_LOW: u8 = 0x00;
    pub const COLUMN_HIGH: u8 = 0x10;
    pub const LINE_DRIVING_NORMAL: u8 = 0x20;
    pub const POWER_SUPPLY_ON: u8 = 0x25;
    pub const START_LINE: u8 = 0x40;
    pub const CONTRAST: u8 = 0x80;
    pub const ADC_NORMAL: u8 = 0xA0;
    pub const DISPLAY_TEST_OFF: u8 = 0xA4;
    pub const DISPLAY_NORMAL: u8 = 0xA6;
    pub const DUTY_1_64: u8 = 0xA9;
    pub const DUTY_PLUS_ONE: u8 = 0xAB;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const PAGE_ADDRESS: u8 = 0xB0;
    pub const OUTPUT_STATUS: u8 = 0xC0;
    pub const SOFTWARE_RESET: u8 = 0xE2;
    pub const POWER_ON_COMPLETION: u8 = 0xED;
}

pub struct Flag;
#[allow(dead_code)]
impl Flag {
    /// Output status operand for the 102x64 glass
    pub const OUTPUT_STATUS_102X64: u8 = 0x0C;
    /// Controller column of logical column 0
    pub const COLUMN_OFFSET: usize = 32;
    pub const NIBBLE: u8 = 0x0F;
    pub const CONTRAST_MAX: u8 = 31;
    pub const CONTRAST_MEDIUM: u8 = 15;
}

//! Driver for the SED1560 controller of the LPH7508
use embedded_hal::delay::DelayNs;
use log::{debug, error, info, trace};

use crate::cmd::Cmd;
use crate::config::{Config, Font};
use crate::error::Error;
use crate::flag::Flag;
use crate::framebuffer::{Framebuffer, PixelSource, Region};
use crate::interface::{Bindings, ControlLine, ParallelInterface, Signal, SignalTransport, Signals};
use crate::memory::DisplayMemory;
use crate::{timing, NAME, PAGES, SCOLS, SROWS};

/// Controller bring-up, run once after the control lines are idle
pub const INIT_SEQUENCE: &[InitStep] = &[
    InitStep::HardReset,
    // just to make sure
    InitStep::Cmd(Cmd::SOFTWARE_RESET),
    InitStep::DelayMs(timing::SOFTWARE_RESET_SETTLE_MS),
    InitStep::Cmd(Cmd::DISPLAY_OFF),
    InitStep::Cmd(Cmd::START_LINE),
    InitStep::Cmd(Cmd::LINE_DRIVING_NORMAL),
    InitStep::Cmd(Cmd::OUTPUT_STATUS | Flag::OUTPUT_STATUS_102X64),
    InitStep::Cmd(Cmd::ADC_NORMAL),
    InitStep::Cmd(Cmd::DUTY_1_64),
    // one more common line for the symbol row
    InitStep::Cmd(Cmd::DUTY_PLUS_ONE),
    InitStep::Cmd(Cmd::POWER_SUPPLY_ON),
    InitStep::DelayMs(timing::POWER_SETTLE_MS),
    InitStep::Cmd(Cmd::POWER_ON_COMPLETION),
    InitStep::Cmd(Cmd::CONTRAST | Flag::CONTRAST_MEDIUM),
    InitStep::Cmd(Cmd::DISPLAY_TEST_OFF),
    InitStep::Cmd(Cmd::DISPLAY_ON),
    InitStep::Cmd(Cmd::DISPLAY_NORMAL),
];

/// Steps of the controller init sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    /// Pulse the reset line and wait for the controller to settle
    HardReset,
    /// Send a bare command byte
    Cmd(u8),
    /// Wait for the given settling time
    DelayMs(u8),
}

/// An initialized LPH7508 panel
pub struct Lph7508<T, DELAY> {
    interface: ParallelInterface<T, DELAY>,
    memory: DisplayMemory,
    font: Font,
}

impl<T, DELAY> Lph7508<T, DELAY>
where
    T: SignalTransport,
    DELAY: DelayNs,
{
    /// Check `config`, open `transport` and bring the controller up.
    ///
    /// On success the panel is blank, both shadow images are zero and the
    /// configured contrast, if any, is applied.
    pub fn new(mut transport: T, delay: DELAY, config: &Config<'_>) -> Result<Self, Error> {
        debug!("creating new {} instance from {}", NAME, config.source);
        let font = config.font()?;
        let lines = config.wiring.lines()?;
        let contrast = config.contrast();

        transport.open(NAME).map_err(|e| {
            error!("{}: could not initialize parallel port!", NAME);
            Error::Open(e)
        })?;
        let signals = match bind(&mut transport, &lines) {
            Ok(signals) => signals,
            Err(e) => {
                let _ = transport.close();
                return Err(e);
            }
        };

        let mut driver = Lph7508 {
            interface: ParallelInterface::new(transport, delay, signals),
            memory: DisplayMemory::new(),
            font,
        };
        let started = driver.power_up().and_then(|()| match contrast {
            Some(c) => driver.contrast(i32::from(c)).map(|_| ()),
            None => Ok(()),
        });
        if let Err(e) = started {
            error!("{}: initialization failed: {}", NAME, e);
            let _ = driver.interface.release();
            return Err(e);
        }
        Ok(driver)
    }

    fn power_up(&mut self) -> Result<(), Error> {
        debug!("powering up {}", NAME);
        self.interface.idle()?;
        for step in INIT_SEQUENCE {
            debug!("init step: {:?}", step);
            match *step {
                InitStep::HardReset => self.interface.hard_reset()?,
                InitStep::Cmd(c) => self.interface.write_ctrl(c)?,
                InitStep::DelayMs(ms) => self.interface.settle_ms(ms),
            }
        }
        self.clear()
    }

    /// Blank every page of the controller and zero both shadow images
    pub fn clear(&mut self) -> Result<(), Error> {
        debug!("clearing {}", NAME);
        for page in 0..PAGES {
            self.select_page(page)?;
            // same offset window blit writes to
            self.select_column(0)?;
            for _ in 0..SCOLS {
                self.interface.write_data(0)?;
            }
        }
        self.memory.clear();
        Ok(())
    }

    /// Set the contrast, clamped to `0..=31`. Returns the value applied.
    pub fn contrast(&mut self, contrast: i32) -> Result<u8, Error> {
        let applied = contrast.clamp(0, i32::from(Flag::CONTRAST_MAX)) as u8;
        debug!("contrast {} (requested {})", applied, contrast);
        self.interface.write_ctrl(Cmd::CONTRAST | applied)?;
        Ok(applied)
    }

    /// Copy `region` of `grid` to the panel, sending only what changed.
    ///
    /// Cells outside the controller's rows or columns are skipped. Every page
    /// the region touches is scanned, plus the page below it for rows that
    /// straddle a page boundary.
    pub fn blit<G>(&mut self, grid: &G, region: Region) -> Result<(), Error>
    where
        G: PixelSource + ?Sized,
    {
        let columns = region.col..region.col_end().min(SCOLS);
        for row in region.row..region.row_end().min(SROWS) {
            for col in columns.clone() {
                self.memory.set_pixel(row, col, grid.pixel(row, col));
            }
        }

        // the controller's page register is not trusted across calls
        let mut addressed = None;
        let last_page = (region.row_end() / 8).min(PAGES - 1);
        for page in region.row / 8..=last_page {
            let mut scan = self.memory.scan(page, columns.clone());
            while let Some(run) = scan.next_run(&self.memory) {
                trace!("blit: page {} columns {}..{}", page, run.start, run.end);
                if addressed != Some(page) {
                    self.select_page(page)?;
                    addressed = Some(page);
                }
                self.select_column(run.start)?;
                for col in run.columns() {
                    self.interface.write_data(self.memory.desired(page, col))?;
                    self.memory.mark_sent(page, col);
                }
            }
        }
        Ok(())
    }

    /// Blit whatever changed in `framebuffer` since the last flush
    pub fn flush(&mut self, framebuffer: &mut Framebuffer) -> Result<(), Error> {
        let Some(region) = framebuffer.take_dirty() else {
            return Ok(());
        };
        self.blit(&*framebuffer, region)
            .inspect_err(|_| framebuffer.mark_dirty(region))
    }

    /// Blank the panel and close the transport, handing back its parts
    pub fn shutdown(mut self) -> Result<(T, DELAY), Error> {
        info!("{}: shutting down.", NAME);
        if let Err(e) = self.clear() {
            error!("{}: could not blank panel on shutdown: {}", NAME, e);
            let _ = self.interface.release();
            return Err(e);
        }
        Ok(self.interface.release()?)
    }

    /// Shadow images of the controller RAM
    pub fn memory(&self) -> &DisplayMemory {
        &self.memory
    }

    /// Text font the panel was configured with
    pub fn font(&self) -> Font {
        self.font
    }

    fn select_page(&mut self, page: usize) -> Result<(), Error> {
        self.interface.write_ctrl(Cmd::PAGE_ADDRESS | page as u8)?;
        Ok(())
    }

    fn select_column(&mut self, column: usize) -> Result<(), Error> {
        let address = column + Flag::COLUMN_OFFSET;
        self.interface
            .write_ctrl(Cmd::COLUMN_LOW | (address as u8 & Flag::NIBBLE))?;
        self.interface
            .write_ctrl(Cmd::COLUMN_HIGH | (address >> 4) as u8)?;
        Ok(())
    }
}

fn bind<T: SignalTransport>(
    transport: &mut T,
    lines: &[(Signal, ControlLine); 4],
) -> Result<Bindings, Error> {
    let mut bound = [Signals::NONE; 4];
    for (slot, &(signal, line)) in bound.iter_mut().zip(lines) {
        *slot = transport.bind(signal, line).map_err(|cause| {
            error!("{}: could not bind signal {} to {}", NAME, signal, line);
            Error::Bind { signal, cause }
        })?;
    }
    let [res, cs1, rw, a0] = bound;
    Ok(Bindings { res, cs1, rw, a0 })
}

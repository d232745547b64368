//! Terminal prompts for the patch values an aircraft config asks the user
//! to fill in before composing.

use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::config::FlatPanelConfig;
use crate::error::ValidationError;
use crate::patch::{Callsign, SelCalCode};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask until the answer parses. Empty input (or end of input) yields
    /// `None`.
    pub fn ask<T>(
        &mut self,
        label: &str,
        current: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> io::Result<Option<T>> {
        loop {
            write!(self.output, "{label} [{current}]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            self.input.read_line(&mut line)?;
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }

            match parse(answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "⚠️  {e}")?,
            }
        }
    }

    /// Fill in every value the config asks for. An empty answer keeps the
    /// configured value when its `default…OnEmpty` flag is set, otherwise
    /// the item is left off the patch.
    pub fn fill_in(&mut self, config: &mut FlatPanelConfig) -> io::Result<()> {
        if config.add_registration && config.ask_for_registration {
            let current = config.flight_patch.aircraft_registration.clone();
            match self.ask("Aircraft registration", &current, |s| Ok(s.to_uppercase()))? {
                Some(registration) => config.flight_patch.aircraft_registration = registration,
                None => config.add_registration = config.default_registration_on_empty,
            }
        }

        if config.add_sel_cal_code && config.ask_for_sel_cal_code {
            let current = config.flight_patch.sel_cal_code.to_string();
            match self.ask("SelCal code", &current, SelCalCode::parse)? {
                Some(code) => config.flight_patch.sel_cal_code = code,
                None => config.add_sel_cal_code = config.default_sel_cal_code_on_empty,
            }
        }

        if config.add_callsign && config.ask_for_callsign {
            let current = config.flight_patch.callsign.to_string();
            match self.ask("Callsign", &current, Callsign::parse)? {
                Some(callsign) => config.flight_patch.callsign = callsign,
                None => config.add_callsign = config.default_callsign_on_empty,
            }
        }

        debug!("📝 Patch after prompts: {:?}", config.compose_flags());
        Ok(())
    }
}

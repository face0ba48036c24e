//! Line-oriented terminal form.
//!
//! Renders the fields, accepts edits, and runs the prediction when the user
//! asks for it. Reads from any `BufRead` and writes to any `Write`, so the
//! same loop drives stdin/stdout and scripted tests.

pub mod fields;

pub use fields::{Field, FieldKind, InputError, Panel};

use crate::assembler::PredictionAssembler;
use crate::error::PredictionError;
use crate::metrics::SessionMetrics;
use crate::types::inputs::FieldValues;
use crate::types::prediction::Prediction;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;

const TITLE: &str = "Methane Emissions Predictor";
const INTRO: &str = "Enter facility and environmental parameters to predict methane emissions.";

const NOTE: &str = "Note: This prediction is based on historical data and environmental parameters.\n\
Actual emissions may vary based on additional factors not captured in this model.";

const ABOUT: &str = "About this tool:\n\
- Uses an XGBoost model trained on historical methane emissions data\n\
- Combines facility characteristics with climate parameters\n\
- Predictions are in tonnes of CH4 per year";

const RETRY_HINT: &str = "Please check if all input values are within expected ranges.";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Field, String),
    Predict,
    Show,
    Reset,
    Help,
    About,
    Quit,
    Empty,
}

impl Command {
    /// Parse `field = value`, `set field value`, or a bare command word.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }

        if let Some((key, value)) = line.split_once('=') {
            return Self::set(key, value);
        }

        let lower = line.to_ascii_lowercase();
        match lower.as_str() {
            "predict" | "predict emissions" => return Ok(Command::Predict),
            "show" | "list" => return Ok(Command::Show),
            "reset" => return Ok(Command::Reset),
            "help" | "?" => return Ok(Command::Help),
            "about" => return Ok(Command::About),
            "quit" | "exit" | "q" => return Ok(Command::Quit),
            _ => {}
        }

        if let Some(rest) = lower.strip_prefix("set ") {
            // Slice the original line so the value keeps its case
            let rest = line[line.len() - rest.len()..].trim_start();
            return match rest.split_once(char::is_whitespace) {
                Some((key, value)) => Self::set(key, value),
                None => Self::set(rest, ""),
            };
        }

        Err(InputError::UnknownCommand(line.to_string()))
    }

    fn set(key: &str, value: &str) -> Result<Self, InputError> {
        let field =
            Field::lookup(key).ok_or_else(|| InputError::UnknownField(key.trim().to_string()))?;
        Ok(Command::Set(field, value.trim().to_string()))
    }
}

/// Whether the loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Form state plus the prediction action
pub struct PredictionForm {
    values: FieldValues,
    assembler: PredictionAssembler,
    metrics: SessionMetrics,
    show_note: bool,
}

impl PredictionForm {
    pub fn new(assembler: PredictionAssembler, show_note: bool) -> Self {
        Self {
            values: FieldValues::default(),
            assembler,
            metrics: SessionMetrics::new(),
            show_note,
        }
    }

    /// Current field values
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Statistics for this session
    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Set one field from raw text, enforcing its range
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), InputError> {
        field.apply(&mut self.values, raw)
    }

    /// Run the prediction on the current values
    pub fn submit(&self) -> Result<Prediction, PredictionError> {
        match self.assembler.run(&self.values) {
            Ok(prediction) => {
                self.metrics.record_prediction(
                    Duration::from_micros(prediction.latency_us),
                    prediction.emissions_tonnes,
                );
                Ok(prediction)
            }
            Err(e) => {
                self.metrics.record_failure();
                Err(e)
            }
        }
    }

    /// Drive the form until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        self.render(&mut output)?;
        prompt(&mut output)?;

        for line in input.lines() {
            let line = line?;
            let flow = match Command::parse(&line) {
                Ok(command) => self.handle(command, &mut output)?,
                Err(e) => {
                    writeln!(output, "{e}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            prompt(&mut output)?;
        }

        writeln!(output, "Goodbye.")?;
        output.flush()
    }

    /// Apply one command and write its response.
    pub fn handle<W: Write>(&mut self, command: Command, output: &mut W) -> io::Result<Flow> {
        debug!(command = ?command, "Form command");

        match command {
            Command::Empty => {}
            Command::Set(field, raw) => match self.set(field, &raw) {
                Ok(()) => writeln!(
                    output,
                    "{} set to {}",
                    field.label(),
                    field.display(&self.values)
                )?,
                Err(e) => writeln!(output, "{e}")?,
            },
            Command::Predict => self.write_prediction(output)?,
            Command::Show => self.render(output)?,
            Command::Reset => {
                self.values = FieldValues::default();
                writeln!(output, "All fields reset to their defaults.")?;
            }
            Command::Help => write_help(output)?,
            Command::About => writeln!(output, "{ABOUT}")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn write_prediction<W: Write>(&self, output: &mut W) -> io::Result<()> {
        match self.submit() {
            Ok(prediction) => {
                writeln!(output, "Predicted Methane Emissions")?;
                writeln!(output, "Annual CH4 Emissions: {}", prediction.formatted())?;
                if self.show_note {
                    writeln!(output, "{NOTE}")?;
                }
            }
            Err(e) => {
                writeln!(output, "An error occurred during prediction: {e}")?;
                writeln!(output, "{RETRY_HINT}")?;
            }
        }
        Ok(())
    }

    /// Write the whole form with current values.
    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "{TITLE}")?;
        writeln!(output, "{INTRO}")?;

        for panel in [Panel::Facility, Panel::Climate] {
            writeln!(output)?;
            writeln!(output, "{}", panel.title())?;
            for field in Field::ALL.iter().filter(|f| f.panel() == panel) {
                writeln!(
                    output,
                    "  {:<30} {:>10}  {}",
                    field.label(),
                    field.display(&self.values),
                    field.describe_range()
                )?;
            }
        }

        writeln!(output)?;
        writeln!(
            output,
            "Type `<field> = <value>` to edit, `predict` to run the model, `help` for commands."
        )
    }
}

fn prompt<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()
}

fn write_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Commands:")?;
    writeln!(output, "  <field> = <value>   set a field (also: set <field> <value>)")?;
    writeln!(output, "  predict             predict emissions from the current values")?;
    writeln!(output, "  show                show the form")?;
    writeln!(output, "  reset               restore default values")?;
    writeln!(output, "  about               about this tool")?;
    writeln!(output, "  quit                leave")?;
    writeln!(output, "Fields:")?;
    for field in Field::ALL {
        let mut names = vec![field.key()];
        names.extend_from_slice(field.aliases());
        writeln!(output, "  {:<30} {}", field.label(), names.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predictor::Predictor;
    use crate::types::record::PredictionRecord;
    use std::sync::Arc;

    /// Returns the pressure/wind interaction so edits are visible in output.
    struct PressureWindPredictor;

    impl Predictor for PressureWindPredictor {
        fn name(&self) -> &str {
            "pressure-wind"
        }

        fn predict(&self, record: &PredictionRecord) -> Result<Vec<f64>, PredictionError> {
            Ok(vec![record.pressure_wind_annual_interaction])
        }
    }

    struct MismatchPredictor;

    impl Predictor for MismatchPredictor {
        fn name(&self) -> &str {
            "mismatch"
        }

        fn predict(&self, _record: &PredictionRecord) -> Result<Vec<f64>, PredictionError> {
            Err(PredictionError::SchemaMismatch(
                "model expects column 'Region'".to_string(),
            ))
        }
    }

    fn form(predictor: impl Predictor + 'static) -> PredictionForm {
        PredictionForm::new(PredictionAssembler::new(Arc::new(predictor)), true)
    }

    fn run_script(form: &mut PredictionForm, script: &str) -> String {
        let mut out = Vec::new();
        form.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), Ok(Command::Empty));
        assert_eq!(Command::parse("PREDICT"), Ok(Command::Predict));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(
            Command::parse("UK Region = Wales"),
            Ok(Command::Set(Field::UkRegion, "Wales".to_string()))
        );
        assert_eq!(
            Command::parse("set Sector Oil&Gas"),
            Ok(Command::Set(Field::Sector, "Oil&Gas".to_string()))
        );
        assert_eq!(
            Command::parse("set pressure"),
            Ok(Command::Set(Field::MeanPressureAnnual, String::new()))
        );
        assert!(matches!(
            Command::parse("dance"),
            Err(InputError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("humidity = 3"),
            Err(InputError::UnknownField(_))
        ));
    }

    #[test]
    fn test_render_shows_defaults() {
        let form = form(PressureWindPredictor);
        let mut out = Vec::new();
        form.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Methane Emissions Predictor\n"));
        assert!(text.contains("Facility Information"));
        assert!(text.contains("Climate Parameters"));
        assert!(text.contains("Mean Pressure Annual (hPa)"));
        assert!(text.contains("Oil&Gas | Power | Waste | Chemical"));
    }

    #[test]
    fn test_predict_with_defaults() {
        let mut form = form(PressureWindPredictor);
        let out = run_script(&mut form, "predict\nquit\n");

        assert!(out.contains("Predicted Methane Emissions"));
        assert!(out.contains("Annual CH4 Emissions: 6078.00 tonnes/year"));
        assert!(out.contains("Note: This prediction is based on historical data"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_edit_then_predict_uses_new_values() {
        let mut form = form(PressureWindPredictor);
        let out = run_script(&mut form, "pressure = 1000\nwind_annual = 5\npredict\n");

        assert!(out.contains("Mean Pressure Annual (hPa) set to 1000.00"));
        assert!(out.contains("Annual CH4 Emissions: 5000.00 tonnes/year"));
        assert_eq!(form.metrics().last_value(), Some(5000.0));
    }

    #[test]
    fn test_rejected_edit_keeps_previous_value() {
        let mut form = form(PressureWindPredictor);
        let out = run_script(&mut form, "pressure = 900\nsector = Nuclear\npredict\n");

        assert!(out.contains("Mean Pressure Annual (hPa) must be between 980.00 and 1030.00"));
        assert!(out.contains("unknown Sector 'Nuclear'"));
        assert!(out.contains("Annual CH4 Emissions: 6078.00 tonnes/year"));
        assert_eq!(form.values(), &FieldValues::default());
    }

    #[test]
    fn test_prediction_error_keeps_form_usable() {
        let mut form = form(MismatchPredictor);
        let out = run_script(&mut form, "predict\nyear = 2020\npredict\n");

        assert_eq!(
            out.matches("An error occurred during prediction: feature schema mismatch")
                .count(),
            2
        );
        assert!(out.contains(RETRY_HINT));
        assert!(out.contains("Year set to 2020"));
        assert_eq!(
            form.metrics()
                .failures
                .load(std::sync::atomic::Ordering::Relaxed),
            2
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = form(PressureWindPredictor);
        run_script(&mut form, "lat = 55\nreset\n");
        assert_eq!(form.values().latitude, 52.0);
    }

    #[test]
    fn test_note_can_be_hidden() {
        let mut form = PredictionForm::new(
            PredictionAssembler::new(Arc::new(PressureWindPredictor)),
            false,
        );
        let out = run_script(&mut form, "predict\n");
        assert!(out.contains("Annual CH4 Emissions"));
        assert!(!out.contains("Note:"));
    }

    #[test]
    fn test_help_and_about() {
        let mut form = form(PressureWindPredictor);
        let out = run_script(&mut form, "help\nabout\n");
        assert!(out.contains("wind_annual"));
        assert!(out.contains("Uses an XGBoost model"));
    }
}

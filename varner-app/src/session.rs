//! Line-oriented order entry: one command per line, live totals echoed after
//! every publication from the engine.

use chrono::Local;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};
use varner_order::{LineId, OrderError, OrderForm, OrderTotals, PaymentTerms, TaxStatus};
use varner_shared::{format_currency, format_plain, Money, MoneyError, TaxRate};
use varner_store::app_config::ExportConfig;
use varner_store::{csv_export, summary_export, ExportError, ExportKind};

const HELP: &str = "\
commands:
  list                     show every line with its quantity
  set <line#> <qty>        enter a quantity (empty clears the line)
  delivery on|off          delivery or pick up
  fee <amount>             delivery fee
  tax <percent>            sales tax rate
  exempt on|off            sales tax exempt
  terms cod|net30          payment terms
  business|contact|cell|phone <text>
  notes <text>             notes on combos
  show                     order settings and totals
  reset                    clear the whole form
  csv [path]               save the order CSV
  summary [path]           save the printable summary
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Set { line: usize, quantity: String },
    Delivery(bool),
    Fee(Money),
    Tax(TaxRate),
    Exempt(bool),
    Terms(PaymentTerms),
    Business(String),
    Contact(String),
    Cell(String),
    Phone(String),
    Notes(String),
    Show,
    Reset,
    Csv(Option<PathBuf>),
    Summary(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" => Command::List,
            "set" => {
                let (line_no, quantity) = match rest.split_once(char::is_whitespace) {
                    Some((line_no, quantity)) => (line_no, quantity.trim_start()),
                    None => (rest, ""),
                };
                if line_no.is_empty() {
                    return Err(CommandError::MissingArgument("set", "a line number"));
                }
                let line = line_no
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| bad("set", line_no))?;
                Command::Set {
                    line,
                    quantity: quantity.to_string(),
                }
            }
            "delivery" => Command::Delivery(on_off("delivery", rest)?),
            "fee" => Command::Fee(required("fee", "an amount", rest)?.parse()?),
            "tax" => Command::Tax(TaxRate::parse_percent(required("tax", "a percentage", rest)?)?),
            "exempt" => Command::Exempt(on_off("exempt", rest)?),
            "terms" => match required("terms", "cod or net30", rest)?.to_ascii_lowercase().as_str() {
                "cod" => Command::Terms(PaymentTerms::CashOnDelivery),
                "net30" => Command::Terms(PaymentTerms::Net30),
                _ => return Err(bad("terms", rest)),
            },
            "business" => Command::Business(rest.to_string()),
            "contact" => Command::Contact(rest.to_string()),
            "cell" => Command::Cell(rest.to_string()),
            "phone" => Command::Phone(rest.to_string()),
            "notes" => Command::Notes(rest.to_string()),
            "show" => Command::Show,
            "reset" => Command::Reset,
            "csv" => Command::Csv(optional_path(rest)),
            "summary" => Command::Summary(optional_path(rest)),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn bad(command: &'static str, value: &str) -> CommandError {
    CommandError::BadArgument {
        command,
        value: value.to_string(),
    }
}

fn required<'a>(command: &'static str, what: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command, what))
    } else {
        Ok(rest)
    }
}

fn on_off(command: &'static str, rest: &str) -> Result<bool, CommandError> {
    match required(command, "on or off", rest)?.to_ascii_lowercase().as_str() {
        "on" | "yes" => Ok(true),
        "off" | "no" => Ok(false),
        _ => Err(bad(command, rest)),
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("Bad argument for `{command}`: {value}")]
    BadArgument { command: &'static str, value: String },

    #[error("Invalid amount: {0}")]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// An open order form plus the totals feed its listener fills.
pub struct Session {
    form: OrderForm,
    export: ExportConfig,
    published: Rc<RefCell<Vec<OrderTotals>>>,
}

impl Session {
    pub fn new(mut form: OrderForm, export: ExportConfig) -> Self {
        let published = Rc::new(RefCell::new(Vec::new()));
        let feed = Rc::clone(&published);
        form.engine_mut()
            .subscribe(move |totals: &OrderTotals| feed.borrow_mut().push(*totals));

        Self {
            form,
            export,
            published,
        }
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    /// Run one command and return the lines to show. `Quit` is a no-op here.
    pub fn execute(&mut self, command: Command) -> Result<Vec<String>, CommandError> {
        let mut out = Vec::new();
        match command {
            Command::List => out.extend(self.list()),
            Command::Set { line, quantity } => {
                // lines are numbered from 1 on screen
                let id = line
                    .checked_sub(1)
                    .map(LineId)
                    .filter(|id| self.form.engine().line(*id).is_some())
                    .ok_or(OrderError::UnknownLine(line))?;
                let change = self.form.engine_mut().set_quantity(id, quantity)?;
                if let Some(rejection) = &change.rejection {
                    out.push(format!("line {} flagged: {}; quantity set to 0", line, rejection));
                }
            }
            Command::Delivery(on) => {
                self.form.engine_mut().set_delivery(on)?;
            }
            Command::Fee(fee) => {
                self.form.engine_mut().set_delivery_fee(fee)?;
            }
            Command::Tax(rate) => {
                self.form.engine_mut().set_tax_rate(rate)?;
            }
            Command::Exempt(exempt) => {
                let status = if exempt { TaxStatus::Exempt } else { TaxStatus::PaysSalesTax };
                self.form.engine_mut().set_tax_status(status)?;
            }
            Command::Terms(terms) => {
                self.form.engine_mut().set_payment_terms(terms)?;
            }
            Command::Business(text) => self.form.customer_mut().business_name = text,
            Command::Contact(text) => self.form.customer_mut().contact_name = text,
            Command::Cell(text) => self.form.customer_mut().cell_phone = text.into(),
            Command::Phone(text) => self.form.customer_mut().business_phone = text.into(),
            Command::Notes(text) => self.form.set_notes(text),
            Command::Show => out.extend(self.show()),
            Command::Reset => {
                self.form.reset()?;
                out.push("form cleared".to_string());
            }
            Command::Csv(path) => {
                let saved = self.export(ExportKind::Csv, path)?;
                out.push(format!("saved {}", saved.display()));
            }
            Command::Summary(path) => {
                let saved = self.export(ExportKind::Summary, path)?;
                out.push(format!("saved {}", saved.display()));
            }
            Command::Help => out.push(HELP.to_string()),
            Command::Quit => {}
        }

        for totals in self.published.borrow_mut().drain(..) {
            out.push(live_totals(&totals));
        }
        Ok(out)
    }

    /// Save an export, to the configured directory under a timestamped name
    /// when no path is given.
    pub fn export(&self, kind: ExportKind, path: Option<PathBuf>) -> Result<PathBuf, CommandError> {
        let now = Local::now();
        let path = path.unwrap_or_else(|| PathBuf::from(&self.export.directory).join(kind.default_file_name(now)));
        let snapshot = self.form.snapshot();

        let saved = match kind {
            ExportKind::Csv => csv_export::save_csv(&snapshot, &path)?,
            ExportKind::Summary => summary_export::save_summary(&snapshot, &self.export.title, now, &path)?,
        };
        Ok(saved)
    }

    fn list(&self) -> Vec<String> {
        self.form
            .engine()
            .lines()
            .iter()
            .map(|line| {
                let product = line.product();
                format!(
                    "{:>3}  {:<48}  {:>5}  {:>8}  {:>10}{}",
                    line.id().0 + 1,
                    product.qualified_name(),
                    line.quantity(),
                    format_plain(product.unit_price()),
                    format_plain(line.line_total()),
                    if line.is_flagged() { "  !" } else { "" }
                )
            })
            .collect()
    }

    fn show(&self) -> Vec<String> {
        let ctx = self.form.engine().context();
        let customer = self.form.customer();
        let totals = self.form.engine().totals();
        vec![
            format!("order {}", self.form.id()),
            format!("business: {} | contact: {}", customer.business_name, customer.contact_name),
            format!(
                "terms: {} | tax: {} ({}%) | {} fee {}",
                ctx.payment_terms(),
                ctx.tax_status(),
                ctx.tax_rate().percent_display(),
                ctx.fulfillment(),
                format_currency(ctx.delivery_fee())
            ),
            live_totals(&totals),
        ]
    }
}

fn live_totals(totals: &OrderTotals) -> String {
    format!(
        "subtotal {} | tax {} | delivery {} | total {}",
        format_currency(totals.subtotal),
        format_currency(totals.tax),
        format_currency(totals.delivery_fee),
        format_currency(totals.grand_total)
    )
}

/// Read commands until `quit` or end of input. Command errors are reported and
/// the session carries on; only I/O failures end it early.
pub fn run_session<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        debug!(?command, "Running command");

        match session.execute(command) {
            Ok(lines) => {
                for text in lines {
                    writeln!(out, "{}", text)?;
                }
            }
            Err(e) => {
                warn!("Command failed: {}", e);
                writeln!(out, "error: {}", e)?;
            }
        }
    }
    out.flush()
}

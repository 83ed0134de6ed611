//! Property Investment CLI
//!
//! Evaluates one financed rental purchase and prints the report

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use property_investment::{
    EvaluationConfig, GrowthScenario, InvestmentEngine, InvestmentReport, NoiTiming,
    ScenarioParameters,
};

/// Mortgage-financed rental property calculator
#[derive(Parser, Debug)]
#[command(
    name = "property-investment",
    version,
    about = "Monthly payment, DTI, projected value and 10-year IRR of a financed rental purchase",
    long_about = "Evaluates a single rental property purchase financed by a fixed-rate mortgage. \
                  Any parameter left unset uses the reference scenario. Rates and fractions are \
                  decimals (0.0329 = 3.29%). Set RUST_LOG=debug to trace the IRR solver."
)]
struct Cli {
    /// Purchase price
    #[arg(long)]
    price: Option<f64>,

    /// Living area in m²
    #[arg(long)]
    area: Option<f64>,

    /// Buyer's cash contribution
    #[arg(long)]
    down_payment: Option<f64>,

    /// Borrower's net monthly income
    #[arg(long)]
    income: Option<f64>,

    /// Acquisition fees as a fraction of price
    #[arg(long)]
    fees: Option<f64>,

    /// Annual loan rate
    #[arg(long)]
    rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    years: Option<u32>,

    /// Annual borrower insurance rate
    #[arg(long)]
    insurance: Option<f64>,

    /// Monthly rent per m²
    #[arg(long)]
    rent: Option<f64>,

    /// Operating charges as a fraction of rent
    #[arg(long)]
    charges: Option<f64>,

    /// Vacancy fraction
    #[arg(long)]
    vacancy: Option<f64>,

    /// Base-case annual appreciation
    #[arg(long, allow_hyphen_values = true)]
    growth_base: Option<f64>,

    /// Best-case annual appreciation
    #[arg(long, allow_hyphen_values = true)]
    growth_best: Option<f64>,

    /// Annual inflation
    #[arg(long, allow_hyphen_values = true)]
    inflation: Option<f64>,

    /// Sale costs as a fraction of sale price
    #[arg(long)]
    sale_cost: Option<f64>,

    /// Explicit loan amount (default: price - (down payment - fees))
    #[arg(long)]
    loan_amount: Option<f64>,

    /// Appreciation scenario driving the resale price
    #[arg(long, value_enum, default_value = "base")]
    scenario: ScenarioArg,

    /// When rental income starts counting toward cashflow
    #[arg(long, value_enum, default_value = "deferred")]
    noi_timing: NoiTimingArg,

    /// First holding year with rental income when timing is deferred
    #[arg(long, default_value_t = NoiTiming::REFERENCE_FIRST_YEAR)]
    noi_first_year: u32,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioArg {
    Base,
    Best,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NoiTimingArg {
    Deferred,
    EveryYear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl Cli {
    fn parameters(&self) -> ScenarioParameters {
        let d = ScenarioParameters::default();
        ScenarioParameters {
            price: self.price.unwrap_or(d.price),
            area: self.area.unwrap_or(d.area),
            down_payment: self.down_payment.unwrap_or(d.down_payment),
            net_monthly_income: self.income.unwrap_or(d.net_monthly_income),
            fee_fraction: self.fees.unwrap_or(d.fee_fraction),
            annual_rate: self.rate.unwrap_or(d.annual_rate),
            years: self.years.unwrap_or(d.years),
            insurance_rate: self.insurance.unwrap_or(d.insurance_rate),
            rent_per_m2: self.rent.unwrap_or(d.rent_per_m2),
            charges_fraction: self.charges.unwrap_or(d.charges_fraction),
            vacancy_fraction: self.vacancy.unwrap_or(d.vacancy_fraction),
            growth_base: self.growth_base.unwrap_or(d.growth_base),
            growth_best: self.growth_best.unwrap_or(d.growth_best),
            inflation: self.inflation.unwrap_or(d.inflation),
            sale_cost_fraction: self.sale_cost.unwrap_or(d.sale_cost_fraction),
            loan_amount: self.loan_amount.or(d.loan_amount),
        }
    }

    fn config(&self) -> EvaluationConfig {
        EvaluationConfig {
            scenario: match self.scenario {
                ScenarioArg::Base => GrowthScenario::Base,
                ScenarioArg::Best => GrowthScenario::Best,
            },
            noi_timing: match self.noi_timing {
                NoiTimingArg::Deferred => NoiTiming::DeferredFromYear(self.noi_first_year),
                NoiTimingArg::EveryYear => NoiTiming::EveryYear,
            },
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let params = cli.parameters();
    let inflation = params.inflation;
    let charges = params.charges_fraction;

    let engine = InvestmentEngine::new(params, cli.config());
    let report = engine.evaluate().context("Unable to evaluate the investment")?;

    match cli.format {
        OutputFormat::Text => print_text(&report, inflation, charges),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Unable to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Csv => write_csv(&report)?,
    }

    Ok(())
}

fn print_text(report: &InvestmentReport, inflation: f64, charges: f64) {
    let scenario = report.scenario.label();

    println!("=== Results ===");
    println!("Loan amount: {}", money(report.loan_amount, 0));
    println!(
        "Monthly P&I: {} ; Insurance: {} ; Total: {}",
        money(report.monthly_payment, 2),
        money(report.monthly_insurance, 2),
        money(report.monthly_total, 2)
    );
    println!("Debt-to-income (DTI): {:.2} % ({})", report.dti.dti * 100.0, report.dti.message());
    println!("Projected value at 5 years ({}): {}", scenario, money(report.projected_value_5y, 0));
    println!("Projected value at 10 years ({}): {}", scenario, money(report.projected_value_10y, 0));
    println!(
        "Net annual rent (charges {:.0}%): {}",
        charges * 100.0,
        money(report.annual_noi, 0)
    );
    println!(
        "Annual rental cashflow (NOI - debt service): {}{}",
        if report.annual_rental_cashflow >= 0.0 { "+" } else { "" },
        money(report.annual_rental_cashflow, 2)
    );
    println!(
        "10-year nominal IRR ({}): {} ; real IRR (inflation {:.1}%): {}",
        scenario,
        percent(report.nominal_irr),
        inflation * 100.0,
        percent(report.real_irr)
    );

    if let Some(reason) = &report.irr_failure {
        println!("  IRR undefined: {}", reason);
    } else if !report.irr_converged {
        println!("  IRR is approximate: solver stopped after {} iterations", report.irr_iterations);
    }

    println!("\nAnnual cashflows:");
    println!("{:>4} {:>12} {:>10} {:>12} {:>12} {:>12}", "Year", "DebtSvc", "NOI", "Sale", "Payoff", "Net");
    println!("{}", "-".repeat(67));
    for row in &report.cashflows {
        println!(
            "{:>4} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2}",
            row.year, row.debt_service, row.noi, row.sale_proceeds, row.loan_payoff, row.net_cashflow
        );
    }
}

fn write_csv(report: &InvestmentReport) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for row in &report.cashflows {
        writer.serialize(row).context("Unable to write cashflow row")?;
    }
    writer.flush().context("Unable to flush CSV output")?;
    Ok(())
}

/// Amount with thousands separators, e.g. 166,000 €
fn money(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{} €", sign, grouped, f),
        None => format!("{}{} €", sign, grouped),
    }
}

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.2} %", r * 100.0),
        None => "undefined".to_string(),
    }
}

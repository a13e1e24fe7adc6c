// NestCalc CLI - headless real-estate calculators
//
// Three closed-form calculators (mortgage, investment, affordability)
// plus an optional AI advisor pass-through. All --json output is a
// single JSON value on stdout with nothing else.

mod exit_codes;
mod output;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nestcalc_advisor::{advise, advise_or_fallback, AdviceRequest, AdviseError, CalculatorKind};
use nestcalc_config::ai::{self, ResolvedAiConfig};
use nestcalc_config::settings::{AiProvider, Settings};
use nestcalc_engine::{affordability, investment, mortgage, CalcError};

use exit_codes::{
    advise_exit_code, EXIT_AI_KEYCHAIN_ERR, EXIT_AI_MISSING_KEY, EXIT_CALC_INVALID, EXIT_ERROR,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "ncalc")]
#[command(about = "Real-estate calculators (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mortgage payment and amortization schedule
    #[command(after_help = "\
Examples:
  ncalc mortgage --home-price 400000 --down-payment 80000 --rate 6.5
  ncalc mortgage --home-price 400000 --down-payment 80000 --rate 6.5 \\
      --tax 4800 --insurance 1800 --schedule
  ncalc mortgage --home-price 400000 --down-payment 80000 --rate 6.5 --json")]
    Mortgage {
        #[command(flatten)]
        args: MortgageArgs,

        /// Print the yearly amortization schedule
        #[arg(long)]
        schedule: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rental investment returns: NOI, cap rate, cash-on-cash
    #[command(after_help = "\
Examples:
  ncalc investment --price 300000 --rent 2400 --down-payment 60000
  ncalc investment --price 300000 --rent 2400 --vacancy 5 \\
      --management 200 --maintenance 150 --down-payment 60000 --json")]
    Investment {
        #[command(flatten)]
        args: InvestmentArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// How much house a gross income can carry (28% front-end ratio)
    #[command(after_help = "\
Examples:
  ncalc affordability --income 120000 --debts 600 --rate 6.5
  ncalc affordability --income 120000 --debts 600 --down-payment 50000 \\
      --rate 6.5 --json")]
    Affordability {
        #[command(flatten)]
        args: AffordabilityArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a calculator and ask the configured AI provider for advice
    Advise {
        #[command(subcommand)]
        target: AdviseTarget,
    },

    /// AI configuration commands
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AdviseTarget {
    /// Advice on a mortgage calculation
    Mortgage {
        #[command(flatten)]
        args: MortgageArgs,
        #[command(flatten)]
        opts: AdviseOpts,
    },
    /// Advice on a rental investment calculation
    Investment {
        #[command(flatten)]
        args: InvestmentArgs,
        #[command(flatten)]
        opts: AdviseOpts,
    },
    /// Advice on an affordability calculation
    Affordability {
        #[command(flatten)]
        args: AffordabilityArgs,
        #[command(flatten)]
        opts: AdviseOpts,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Check AI configuration and connectivity
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,

        /// Test provider connectivity (requires network)
        #[arg(long)]
        test: bool,
    },

    /// Store an API key in the system keychain
    SetKey {
        /// Provider the key belongs to
        #[arg(value_enum)]
        provider: ProviderArg,

        /// The API key
        key: String,
    },

    /// Remove an API key from the system keychain
    ClearKey {
        /// Provider whose key to remove
        #[arg(value_enum)]
        provider: ProviderArg,
    },
}

#[derive(Args)]
struct MortgageArgs {
    /// Purchase price of the home
    #[arg(long)]
    home_price: f64,

    /// Cash paid up front
    #[arg(long)]
    down_payment: f64,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    term: u32,

    /// Annual interest rate as a percent (e.g. 6.5)
    #[arg(long)]
    rate: f64,

    /// Annual property tax
    #[arg(long, default_value_t = 0.0)]
    tax: f64,

    /// Annual homeowner's insurance
    #[arg(long, default_value_t = 0.0)]
    insurance: f64,
}

impl MortgageArgs {
    fn to_inputs(&self) -> mortgage::MortgageInputs {
        mortgage::MortgageInputs {
            home_price: self.home_price,
            down_payment: self.down_payment,
            loan_term_years: self.term,
            annual_rate_pct: self.rate,
            annual_property_tax: self.tax,
            annual_insurance: self.insurance,
        }
    }
}

#[derive(Args)]
struct InvestmentArgs {
    /// Purchase price of the property
    #[arg(long)]
    price: f64,

    /// Expected monthly rent
    #[arg(long)]
    rent: f64,

    /// Other monthly income (parking, laundry, storage)
    #[arg(long, default_value_t = 0.0)]
    other_income: f64,

    /// Monthly property management fee
    #[arg(long, default_value_t = 0.0)]
    management: f64,

    /// Monthly maintenance reserve
    #[arg(long, default_value_t = 0.0)]
    maintenance: f64,

    /// Expected vacancy as a percent of gross rent
    #[arg(long, default_value_t = 0.0)]
    vacancy: f64,

    /// Cash invested up front
    #[arg(long)]
    down_payment: f64,
}

impl InvestmentArgs {
    fn to_inputs(&self) -> investment::InvestmentInputs {
        investment::InvestmentInputs {
            purchase_price: self.price,
            monthly_rent: self.rent,
            other_monthly_income: self.other_income,
            monthly_management_fee: self.management,
            monthly_maintenance: self.maintenance,
            vacancy_rate_pct: self.vacancy,
            down_payment: self.down_payment,
        }
    }
}

#[derive(Args)]
struct AffordabilityArgs {
    /// Gross annual income
    #[arg(long)]
    income: f64,

    /// Existing monthly debt payments
    #[arg(long, default_value_t = 0.0)]
    debts: f64,

    /// Cash available for a down payment
    #[arg(long, default_value_t = 0.0)]
    down_payment: f64,

    /// Annual interest rate as a percent
    #[arg(long)]
    rate: f64,
}

impl AffordabilityArgs {
    fn to_inputs(&self) -> affordability::AffordabilityInputs {
        affordability::AffordabilityInputs {
            annual_income: self.income,
            monthly_debts: self.debts,
            down_payment: self.down_payment,
            annual_rate_pct: self.rate,
        }
    }
}

#[derive(Args)]
struct AdviseOpts {
    /// Provider override (otherwise taken from settings)
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// API endpoint override (proxy or test server)
    #[arg(long)]
    endpoint: Option<String>,

    /// API key override (otherwise keychain or NESTCALC_<PROVIDER>_KEY)
    #[arg(long, env = "NESTCALC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print only the advice text; degrade to a fixed message on error
    #[arg(long)]
    plain: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Openai,
    Gemini,
    Local,
}

impl ProviderArg {
    fn to_provider(self) -> AiProvider {
        match self {
            ProviderArg::Openai => AiProvider::OpenAi,
            ProviderArg::Gemini => AiProvider::Gemini,
            ProviderArg::Local => AiProvider::Local,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: ncalc <command> [options]");
            eprintln!("       ncalc --help for more information");
            Err(CliError { code: EXIT_USAGE, message: String::new(), hint: None })
        }
        Some(Commands::Mortgage { args, schedule, json }) => cmd_mortgage(&args, schedule, json),
        Some(Commands::Investment { args, json }) => cmd_investment(&args, json),
        Some(Commands::Affordability { args, json }) => cmd_affordability(&args, json),
        Some(Commands::Advise { target }) => match target {
            AdviseTarget::Mortgage { args, opts } => {
                let results = mortgage::calculate(&args.to_inputs()).map_err(CliError::calc);
                results.and_then(|r| cmd_advise(CalculatorKind::Mortgage, &args.to_inputs(), &r, &opts))
            }
            AdviseTarget::Investment { args, opts } => {
                let results = investment::calculate(&args.to_inputs()).map_err(CliError::calc);
                results.and_then(|r| cmd_advise(CalculatorKind::Investment, &args.to_inputs(), &r, &opts))
            }
            AdviseTarget::Affordability { args, opts } => {
                let results = affordability::calculate(&args.to_inputs()).map_err(CliError::calc);
                results.and_then(|r| cmd_advise(CalculatorKind::Affordability, &args.to_inputs(), &r, &opts))
            }
        },
        Some(Commands::Ai { command }) => match command {
            AiCommands::Doctor { json, test } => cmd_ai_doctor(json, test),
            AiCommands::SetKey { provider, key } => cmd_ai_set_key(provider, &key),
            AiCommands::ClearKey { provider } => cmd_ai_clear_key(provider),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Calculator input rejected.
    pub fn calc(err: CalcError) -> Self {
        Self { code: EXIT_CALC_INVALID, message: err.to_string(), hint: None }
    }

    /// Create error from advise error with proper exit code.
    pub fn advise(err: AdviseError, provider: AiProvider) -> Self {
        let code = advise_exit_code(&err);
        let hint = match &err {
            AdviseError::NotConfigured(_) => Some(
                "set ai.provider in settings.json or pass --provider".to_string(),
            ),
            AdviseError::MissingKey => Some(format!(
                "set {} or run: ncalc ai set-key {}",
                ai::env_var_name(provider),
                provider.name()
            )),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

// ============================================================================
// Calculators
// ============================================================================

fn cmd_mortgage(args: &MortgageArgs, schedule: bool, json: bool) -> Result<(), CliError> {
    let inputs = args.to_inputs();
    let results = mortgage::calculate(&inputs).map_err(CliError::calc)?;
    let settings = Settings::load();

    if json {
        let value = serde_json::json!({
            "schema_version": 1,
            "calculator": "mortgage",
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(|e| CliError::general(e.to_string()))?);
        return Ok(());
    }

    let out = &settings.output;
    let principal = inputs.home_price - inputs.down_payment;
    println!("Mortgage");
    println!("--------");
    println!("loan amount:     {}", output::currency(principal, out));
    println!("monthly payment: {}", output::currency(results.monthly_payment, out));
    println!(
        "  principal+interest {} / tax {} / insurance {}",
        output::currency(results.loan_payment, out),
        output::currency(inputs.annual_property_tax / 12.0, out),
        output::currency(inputs.annual_insurance / 12.0, out),
    );
    println!("total interest:  {}", output::currency(results.total_interest, out));
    println!("total cost:      {}", output::currency(results.total_cost, out));

    if schedule {
        println!();
        println!("{:>4}  {:>14}  {:>14}  {:>16}", "year", "principal", "interest", "balance");
        for point in &results.schedule {
            println!(
                "{:>4}  {:>14}  {:>14}  {:>16}",
                point.year,
                output::currency(point.principal, out),
                output::currency(point.interest, out),
                output::currency(point.remaining_balance, out),
            );
        }
    }

    Ok(())
}

fn cmd_investment(args: &InvestmentArgs, json: bool) -> Result<(), CliError> {
    let results = investment::calculate(&args.to_inputs()).map_err(CliError::calc)?;
    let settings = Settings::load();

    if json {
        let value = serde_json::json!({
            "schema_version": 1,
            "calculator": "investment",
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(|e| CliError::general(e.to_string()))?);
        return Ok(());
    }

    let out = &settings.output;
    println!("Rental investment");
    println!("-----------------");
    println!("gross income:      {}/yr", output::currency(results.gross_annual_income, out));
    println!("effective income:  {}/yr", output::currency(results.effective_gross_income, out));
    println!("operating costs:   {}/yr", output::currency(results.operating_expenses, out));
    println!("NOI:               {}/yr", output::currency(results.noi, out));
    println!("cap rate:          {}", output::percent(results.cap_rate_pct));
    println!("cash-on-cash:      {}", output::percent(results.cash_on_cash_pct));
    println!("monthly cash flow: {}", output::currency(results.monthly_cash_flow, out));

    Ok(())
}

fn cmd_affordability(args: &AffordabilityArgs, json: bool) -> Result<(), CliError> {
    let results = affordability::calculate(&args.to_inputs()).map_err(CliError::calc)?;
    let settings = Settings::load();

    if json {
        let value = serde_json::json!({
            "schema_version": 1,
            "calculator": "affordability",
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(|e| CliError::general(e.to_string()))?);
        return Ok(());
    }

    let out = &settings.output;
    println!("Affordability");
    println!("-------------");
    println!("max home price:      {}", output::currency(results.max_home_price, out));
    println!("max loan:            {}", output::currency(results.max_loan, out));
    println!("max monthly payment: {}", output::currency(results.max_monthly_payment, out));

    Ok(())
}

// ============================================================================
// Advise
// ============================================================================

fn resolve_advise_config(opts: &AdviseOpts) -> ResolvedAiConfig {
    let mut settings = Settings::load();
    if let Some(provider) = opts.provider {
        settings.ai.provider = provider.to_provider();
    }
    if let Some(model) = &opts.model {
        settings.ai.model = model.clone();
    }

    let mut config = ResolvedAiConfig::from_settings(&settings);
    if let Some(endpoint) = &opts.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(key) = &opts.api_key {
        config = config.with_api_key(key.clone());
    }
    config
}

fn cmd_advise(
    kind: CalculatorKind,
    inputs: &impl serde::Serialize,
    results: &impl serde::Serialize,
    opts: &AdviseOpts,
) -> Result<(), CliError> {
    let config = resolve_advise_config(opts);

    // Privacy mode sends derived metrics only, never the raw inputs
    let data = if config.privacy_mode {
        serde_json::json!({ "results": results })
    } else {
        serde_json::json!({ "inputs": inputs, "results": results })
    };
    let request = AdviceRequest { kind, data };

    if opts.plain {
        println!("{}", advise_or_fallback(&config, &request));
        return Ok(());
    }

    let advice = advise(&config, &request).map_err(|e| CliError::advise(e, config.provider))?;

    for warning in &advice.warnings {
        eprintln!("warning: {}", warning);
    }

    if opts.json {
        let value = serde_json::json!({
            "schema_version": 1,
            "calculator": kind,
            "provider": config.provider.name(),
            "model": advice.model,
            "advice": advice.text,
            "warnings": advice.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(|e| CliError::general(e.to_string()))?);
    } else {
        println!("{}", advice.text);
    }

    Ok(())
}

// ============================================================================
// AI configuration
// ============================================================================

fn cmd_ai_doctor(json: bool, test: bool) -> Result<(), CliError> {
    let mut settings = Settings::load();
    let config = ResolvedAiConfig::from_settings(&settings);

    let enabled = config.provider.is_enabled();
    let model_configured = !settings.ai.model.is_empty();
    let model_effective = if enabled {
        config.model.clone()
    } else {
        "(none)".to_string()
    };
    let keychain_available = ai::keychain_available();

    let context_policy = if config.privacy_mode {
        "derived_metrics_only"
    } else {
        "inputs_and_results"
    };

    // Connectivity test: one minimal advise round-trip
    let test_result = if test {
        let result = if config.status.is_ready() {
            let request = AdviceRequest {
                kind: CalculatorKind::Mortgage,
                data: serde_json::json!({"results": {"connectivity_check": true}}),
            };
            match advise(&config, &request) {
                Ok(_) => "ok".to_string(),
                Err(e) => format!("failed: {}", e),
            }
        } else {
            format!("skipped: {}", config.status.as_str())
        };

        settings.ai.last_key_test = Some(chrono::Utc::now().to_rfc3339());
        settings.ai.last_key_test_result = Some(result.clone());
        if let Err(e) = settings.save() {
            eprintln!("warning: could not record test result: {}", e);
        }

        Some(result)
    } else {
        None
    };

    if json {
        let value = serde_json::json!({
            "schema_version": 1,
            "status": config.status.as_str(),
            "blocking_reason": config.blocking_reason,
            "enabled": enabled,
            "provider": config.provider.name(),
            "model_configured": model_configured,
            "model_effective": model_effective,
            "privacy_mode": config.privacy_mode,
            "context_policy": context_policy,
            "key": if config.api_key.is_some() { "present" } else { "missing" },
            "key_source": config.key_source.as_str(),
            "keychain": if keychain_available { "ok" } else { "unavailable" },
            "endpoint": config.endpoint,
            "test": test_result.as_deref().unwrap_or("skipped"),
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(|e| CliError::general(e.to_string()))?);
    } else {
        println!("AI Doctor");
        println!("---------");
        println!("status:          {}", config.status.as_str());
        if let Some(reason) = &config.blocking_reason {
            println!("blocking_reason: {}", reason);
        }
        println!("provider:        {}", config.provider.name());
        println!("model_configured:{}", model_configured);
        println!("model_effective: {}", model_effective);
        println!("privacy_mode:    {}", config.privacy_mode);
        println!("context_policy:  {}", context_policy);
        println!("key:             {}", if config.api_key.is_some() { "present" } else { "missing" });
        println!("key_source:      {}", config.key_source.as_str());
        println!("keychain:        {}", if keychain_available { "ok" } else { "unavailable" });
        if let Some(endpoint) = &config.endpoint {
            println!("endpoint:        {}", endpoint);
        }
        match &test_result {
            Some(result) => println!("test:            {}", result),
            None => println!("test:            skipped (use --test)"),
        }

        // Actionable fix suggestions
        if let Some(reason) = &config.blocking_reason {
            println!();
            match reason.as_str() {
                "provider=none" => {
                    println!("AI is disabled. To enable:");
                    println!("  Set ai.provider in {}", Settings::config_path().display());
                }
                "missing_api_key" => {
                    println!(
                        "Fix: set {} or run: ncalc ai set-key {}",
                        ai::env_var_name(config.provider),
                        config.provider.name()
                    );
                }
                _ => {}
            }
        }
    }

    // Doctor reports, it does not fail: misconfiguration is its output,
    // not its error.
    Ok(())
}

fn cmd_ai_set_key(provider: ProviderArg, key: &str) -> Result<(), CliError> {
    let provider = provider.to_provider();
    if key.trim().is_empty() {
        return Err(CliError {
            code: EXIT_AI_MISSING_KEY,
            message: "refusing to store an empty key".to_string(),
            hint: None,
        });
    }
    ai::set_api_key(provider, key).map_err(|e| CliError {
        code: EXIT_AI_KEYCHAIN_ERR,
        message: e,
        hint: Some(format!(
            "keychain unavailable? export {} instead",
            ai::env_var_name(provider)
        )),
    })?;
    eprintln!("stored key for {}", provider.name());
    Ok(())
}

fn cmd_ai_clear_key(provider: ProviderArg) -> Result<(), CliError> {
    let provider = provider.to_provider();
    ai::delete_api_key(provider).map_err(|e| CliError {
        code: EXIT_AI_KEYCHAIN_ERR,
        message: e,
        hint: None,
    })?;
    eprintln!("cleared key for {}", provider.name());
    Ok(())
}

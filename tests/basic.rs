use anyhow::anyhow;
use chebpe::{Cli, Summary};
use clap::Parser;
use std::io::Write;

const MAXCALLS: u64 = 10_000_000;

#[test]
fn single_run() -> anyhow::Result<()> {
    test(&["0.3", "--eps", "0.005", "--seed", "7"], 1)
}

#[test]
fn extreme_target() -> anyhow::Result<()> {
    test(&["0.999", "--eps", "0.002"], 1)
}

#[test]
fn parallel_runs() -> anyhow::Result<()> {
    test(&["0.72", "--runs", "8", "--seed", "100", "--eps", "0.02"], 8)
}

fn test(args: &[&str], runs: usize) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("chebpe").chain(args.iter().copied()))?;
    let outcomes = cli.outcomes()?;
    assert_eq!(outcomes.len(), runs);
    let eps = cli.config()?.eps;
    for outcome in &outcomes {
        assert!(outcome.result.ci_width <= eps);
        if outcome.result.num_oracle_calls >= MAXCALLS {
            return Err(anyhow!("oracle call limit reached"));
        }
    }
    // Same seeds, same outcomes.
    let again = cli.outcomes()?;
    for (a, b) in outcomes.iter().zip(&again) {
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.result, b.result);
    }
    let summary = Summary::new(&outcomes);
    assert_eq!(summary.runs, runs);
    assert!(summary.max_error >= summary.mean_error);
    assert!(summary.max_calls as f64 >= summary.mean_calls);
    Ok(())
}

#[test]
fn config_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("chebpe-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path)?;
    write!(
        file,
        r#"{{ "eps": 0.03, "alpha": 0.1, "shots_per_batch": 20 }}"#
    )?;
    drop(file);
    let cli = Cli::try_parse_from([
        "chebpe",
        "0.5",
        "--config",
        path.to_str().ok_or_else(|| anyhow!("non UTF-8 path"))?,
        "--alpha",
        "0.2",
    ])?;
    let config = cli.config();
    std::fs::remove_file(&path)?;
    let config = config?;
    assert_eq!(config.eps, 0.03);
    assert_eq!(config.alpha, 0.2);
    assert_eq!(config.shots_per_batch, 20);
    assert_eq!(config.r, 2.0);
    Ok(())
}

#[test]
fn invalid_arguments() -> anyhow::Result<()> {
    assert!(Cli::try_parse_from(["chebpe", "1.5"])?.outcomes().is_err());
    assert!(Cli::try_parse_from(["chebpe", "0.5", "--ratio", "1"])?.config().is_err());
    assert!(Cli::try_parse_from(["chebpe", "0.5", "--runs", "0"])?.outcomes().is_err());
    assert!(Cli::try_parse_from(["chebpe", "0.5", "--max-calls", "10"])?.outcomes().is_err());
    assert!(Cli::try_parse_from(["chebpe"]).is_err());
    Ok(())
}

use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

use qrverify::{QRBuilder, Strength, DEFAULT_SIZE};

/// qrverify - QR codes that are proven to read back
#[derive(Parser, Debug)]
#[command(name = "qrverify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a verified QR code
    Encode(EncodeArgs),

    /// Verify a QR code image. Exit 0 on success, exit 1 on failure
    Verify(VerifyArgs),

    /// Demonstrate the encode/verify workflow
    Demo,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Data to encode
    data: String,

    /// Output file
    #[arg(short, long, default_value = "qr.png")]
    output: PathBuf,

    /// Recovery level: low, medium, high, highest. Omit to escalate from medium as needed
    #[arg(short, long)]
    recovery: Option<Strength>,

    /// Size in pixels
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: u32,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// PNG file to read
    file: PathBuf,

    /// Data the QR code must contain
    expected: String,

    /// Include the decoded and expected data in failure messages
    #[arg(long)]
    detail: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Encode(args) => encode_command(args),
        Command::Verify(args) => verify_command(args),
        Command::Demo => demo_command(),
    }
}

fn encode_command(args: EncodeArgs) -> anyhow::Result<()> {
    let mut builder = QRBuilder::new(&args.data);
    builder.size(args.size);
    if let Some(r) = args.recovery {
        builder.strength(r);
    }

    let qr = builder.build()?;
    qr.save(&args.output).with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Created {} ({}x{}, recovery: {})",
        args.output.display(),
        qr.size(),
        qr.size(),
        qr.strength().name()
    );
    Ok(())
}

fn verify_command(args: VerifyArgs) -> anyhow::Result<()> {
    let png = fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;

    if let Err(e) = qrverify::verify(&png, &args.expected) {
        return Err(if args.detail { anyhow::Error::msg(e.detail()) } else { e.into() });
    }

    println!("Verification passed");
    Ok(())
}

fn demo_command() -> anyhow::Result<()> {
    let data = "Hello, QR World!";
    println!("Demo: Encoding {data:?}");

    let mut file = tempfile::Builder::new()
        .prefix("qrverify-demo-")
        .suffix(".png")
        .tempfile()
        .context("creating temporary file")?;
    let res = demo_round_trip(data, &mut file);

    println!("Cleaning up...");
    let closed = file.close().context("removing temporary file");
    res.and(closed)
}

fn demo_round_trip(data: &str, file: &mut NamedTempFile) -> anyhow::Result<()> {
    let qr = QRBuilder::new(data).build()?;
    file.write_all(qr.image())
        .and_then(|_| file.flush())
        .context("writing temporary file")?;
    println!("Created temporary QR code at {}", file.path().display());

    println!("Verifying...");
    let png = fs::read(file.path()).context("reading temporary file")?;
    qrverify::verify(&png, data)?;

    println!("Verification passed!");
    println!("QR Code Details:");
    println!("  Recovery: {}", qr.strength());
    println!("  Size: {}x{}", qr.size(), qr.size());
    if let Some(v) = qr.version() {
        println!("  Version: {v}");
    }
    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use std::fs;

    use clap::{CommandFactory, Parser};
    use test_case::test_case;

    use super::{demo_round_trip, run, Cli, Command};
    use qrverify::{Strength, PNG_SIGNATURE};

    // Renders an error the way `main` reports it
    fn report(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        format!("{:#}", run(cli.command).unwrap_err())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode_defaults() {
        let cli = Cli::try_parse_from(["qrverify", "encode", "hello"]).unwrap();
        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.data, "hello");
                assert_eq!(args.output.to_str(), Some("qr.png"));
                assert_eq!(args.recovery, None);
                assert_eq!(args.size, 256);
            }
            c => panic!("Expected encode, got {c:?}"),
        }
    }

    #[test]
    fn test_parse_encode_flags() {
        let cli = Cli::try_parse_from([
            "qrverify", "encode", "hello", "-o", "out.png", "-r", "Highest", "-s", "512",
        ])
        .unwrap();
        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.recovery, Some(Strength::Highest));
                assert_eq!(args.size, 512);
            }
            c => panic!("Expected encode, got {c:?}"),
        }
    }

    #[test]
    fn test_parse_invalid_recovery() {
        assert!(Cli::try_parse_from(["qrverify", "encode", "hello", "-r", "max"]).is_err());
    }

    #[test]
    fn test_parse_verify_requires_expected() {
        assert!(Cli::try_parse_from(["qrverify", "verify", "qr.png"]).is_err());
    }

    #[test]
    fn test_encode_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        let path_str = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["qrverify", "encode", "verified data", "-o", path_str])
            .unwrap();
        run(cli.command).unwrap();
        assert!(path.exists());

        let cli = Cli::try_parse_from(["qrverify", "verify", path_str, "verified data"]).unwrap();
        run(cli.command).unwrap();

        let cli = Cli::try_parse_from(["qrverify", "verify", path_str, "Verified data"]).unwrap();
        let err = format!("{:#}", run(cli.command).unwrap_err());
        assert!(err.starts_with("verification failed"), "{err}");
        assert!(!err.contains("erified data"), "{err}");
    }

    #[test]
    fn test_verify_detail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        let qr = qrverify::QRBuilder::new("abc").build().unwrap();
        qr.save(&path).unwrap();

        let err = report(&["qrverify", "verify", path.to_str().unwrap(), "abd", "--detail"]);
        assert!(err.contains("\"abd\""));
        assert!(err.contains("\"abc\""));
    }

    #[test]
    fn test_verify_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let cli = Cli::try_parse_from(["qrverify", "verify", path.to_str().unwrap(), "x"]).unwrap();
        assert!(run(cli.command).is_err());
    }

    #[test_case(&["qrverify", "encode", ""], "failed to create QR code: empty data"; "empty")]
    #[test_case(
        &["qrverify", "encode", "Hi", "-s", "10", "-r", "low"],
        "failed to create QR code: cannot fit a 29x29 module symbol into 10x10 pixels";
        "too small"
    )]
    #[test_case(
        &["qrverify", "encode", "Hi", "-s", "24000"],
        "failed to create QR code: 24000x24000 pixels exceeds the 8192x8192 pixel limit";
        "too large"
    )]
    fn test_encode_error_report(args: &[&str], expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("qr.png");
        let mut args = args.to_vec();
        args.extend(["-o", out.to_str().unwrap()]);

        assert_eq!(report(&args), expected);
        assert!(!out.exists());
    }

    #[test]
    fn test_report_has_no_repeated_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.png");
        fs::write(&path, b"not a png").unwrap();

        let errs = [
            report(&["qrverify", "encode", ""]),
            report(&["qrverify", "verify", path.to_str().unwrap(), "x"]),
        ];
        for err in errs {
            let segs: Vec<_> = err.split(": ").collect();
            for (i, s) in segs.iter().enumerate() {
                assert!(!segs[i + 1..].contains(s), "Repeated {s:?} in {err:?}");
            }
        }
    }

    #[test]
    fn test_demo() {
        run(Command::Demo).unwrap();
    }

    #[test]
    fn test_demo_round_trip_writes_png() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        demo_round_trip("Hello, QR World!", &mut file).unwrap();
        assert!(fs::read(file.path()).unwrap().starts_with(&PNG_SIGNATURE));
    }
}

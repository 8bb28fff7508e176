use std::error::Error;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rfcuuid::{Uuid, Version};

#[derive(Parser)]
#[command(name = "rfcuuid")]
#[command(about = "Generate a UUID, or decode the one given")]
struct Cli {
    /// Parse given UUID ('-' for STDIN)
    #[arg(short = 'd', value_name = "UUID")]
    decode: Option<String>,

    /// Version to generate
    #[arg(short = 'g', long = "generate", value_enum, default_value_t = Kind::V1)]
    kind: Kind,

    /// Number of UUIDs to generate
    #[arg(short = 'n', default_value_t = 1)]
    count: usize,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Kind {
    V1,
    V4,
    V6,
    V7,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match &cli.decode {
        Some(arg) => read_input(arg, &mut io::stdin().lock())
            .map_err(Box::<dyn Error>::from)
            .and_then(|text| decode(&text, &mut io::stdout().lock())),
        None => generate(cli.kind, cli.count, &mut io::stdout().lock()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns `arg`, or one line read from `stdin` if `arg` is `-`, without the trailing newline.
fn read_input(arg: &str, stdin: &mut impl Read) -> io::Result<String> {
    let mut text = if arg == "-" {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        buf
    } else {
        arg.to_owned()
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn generate(kind: Kind, count: usize, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    for _ in 0..count {
        let uuid = match kind {
            Kind::V1 => rfcuuid::new_v1()?,
            Kind::V4 => rfcuuid::new_v4()?,
            Kind::V6 => rfcuuid::new_v6()?,
            Kind::V7 => rfcuuid::new_v7()?,
        };
        writeln!(out, "{}", uuid)?;
    }
    Ok(())
}

fn decode(text: &str, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let uuid: Uuid = text.parse()?;
    writeln!(out, "UUID= {}", uuid)?;
    if let Some(date) = format_date(&uuid) {
        writeln!(out, "DATE= {}", date)?;
    }
    Ok(())
}

/// Formats the embedded time of a time-based UUID in UTC, e.g.
/// `2017-06-07 Wed 16:55:35.81294Z +0000`.
fn format_date(uuid: &Uuid) -> Option<String> {
    if !matches!(
        uuid.version(),
        Version::MAC | Version::DCE | Version::SORT_MAC | Version::SORT_RAND
    ) {
        return None;
    }
    let (secs, nanos) = uuid.time()?.unix_time();
    let t = chrono::DateTime::from_timestamp(secs, nanos as u32)?;
    Some(format!(
        "{}.{:05}Z {}",
        t.format("%Y-%m-%d %a %H:%M:%S"),
        nanos / 10_000,
        t.format("%z")
    ))
}

#[cfg(test)]
mod tests {
    use super::{decode, format_date, generate, read_input, Kind};

    /// Reads one line from stdin for dash
    #[test]
    fn reads_one_line_from_stdin_for_dash() {
        let mut stdin = &b"20616934-4ba2-11e7-8000-010203040506\n"[..];
        assert_eq!(
            read_input("-", &mut stdin).unwrap(),
            "20616934-4ba2-11e7-8000-010203040506"
        );
        let mut stdin = &b"unused"[..];
        assert_eq!(read_input("abc\r\n", &mut stdin).unwrap(), "abc");
        assert_eq!(read_input("abc", &mut stdin).unwrap(), "abc");
    }

    /// Prints uuid and date of time-based UUID
    #[test]
    fn prints_uuid_and_date_of_time_based_uuid() {
        let mut out = Vec::new();
        decode("20616934-4ba2-11e7-8000-010203040506", &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "UUID= 20616934-4ba2-11e7-8000-010203040506\n\
             DATE= 2017-06-07 Wed 16:55:35.81294Z +0000\n"
        );

        let mut out = Vec::new();
        decode("1E74BA22-0616-6934-8000-010203040506", &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "UUID= 1e74ba22-0616-6934-8000-010203040506\n\
             DATE= 2017-06-07 Wed 16:55:35.81294Z +0000\n"
        );
    }

    /// Omits date of versions without time
    #[test]
    fn omits_date_of_versions_without_time() {
        let mut out = Vec::new();
        decode("6fa459ea-ee8a-3ca4-894e-db77e160355e", &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "UUID= 6fa459ea-ee8a-3ca4-894e-db77e160355e\n"
        );
        assert_eq!(format_date(&rfcuuid::Uuid::NIL), None);
    }

    /// Surfaces parse errors
    #[test]
    fn surfaces_parse_errors() {
        let mut out = Vec::new();
        let err = decode("not-a-uuid", &mut out).unwrap_err();
        assert!(err.to_string().starts_with("invalid UUID format"));
        assert!(out.is_empty());
    }

    /// Generates requested number of lines
    #[test]
    fn generates_requested_number_of_lines() {
        for (kind, version) in [(Kind::V1, '1'), (Kind::V4, '4'), (Kind::V6, '6'), (Kind::V7, '7')] {
            let mut out = Vec::new();
            generate(kind, 3, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 3);
            for e in lines {
                assert_eq!(e.len(), 36);
                assert_eq!(e.chars().nth(14), Some(version));
            }
        }
    }
}

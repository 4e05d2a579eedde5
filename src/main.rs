// main.rs      giframe command
//
// Copyright (c) 2026  giframe developers
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use giframe::{Frame, Gif};
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("show", Some(matches)) => show(&mut out, matches)?,
        _ => panic!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("giframe")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF frame inspector")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("show")
                .about("Show GIF frame table")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input file(s)"),
                ),
        )
}

/// Handle show subcommand
fn show(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let values = matches.values_of_os("files").unwrap();
    for path in values {
        show_file(out, path)?;
    }
    Ok(())
}

/// Show one GIF file
fn show_file(
    out: &mut StandardStream,
    path: &OsStr,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let bytes = fs::read(path)?;
    let gif = giframe::decode(&bytes)?;
    let frame_digits = digits(gif.num_frames()).max(3);
    let size_digits = 4.max(1 + digits(gif.width()) + digits(gif.height()));
    out.set_color(&magenta)?;
    writeln!(out, "{:?}", path)?;
    out.set_color(&bold)?;
    write!(
        out,
        "{}x{}, frames: {}",
        gif.width(),
        gif.height(),
        gif.num_frames()
    )?;
    if let Some(c) = gif.loop_count() {
        write!(out, ", repeat: ")?;
        if c == 0 {
            write!(out, "∞")?;
        } else {
            write!(out, "{}", c)?;
        }
    }
    if let Some(bg) = gif.background_color() {
        write!(out, ", background: {}", bg)?;
    }
    writeln!(out)?;
    out.set_color(&yellow)?;
    write!(out, "{:>w$}", "Fr#", w = frame_digits)?;
    write!(out, "  Delay")?;
    write!(out, " {:>w$}", "Size", w = size_digits)?;
    writeln!(out, " {:>w$}", "X,Y", w = size_digits)?;
    for (n, frame) in gif.frames().iter().enumerate() {
        show_frame(&gif, frame, out, n, frame_digits, size_digits)?;
    }
    Ok(())
}

/// Show one frame of a GIF file
fn show_frame(
    gif: &Gif,
    frame: &Frame,
    out: &mut StandardStream,
    number: usize,
    frame_digits: usize,
    size_digits: usize,
) -> Result<(), Box<dyn Error>> {
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    out.set_color(&bold)?;
    write!(out, "{:>w$}", number, w = frame_digits)?;
    let d = frame.delay_time_cs();
    if d == 0 {
        out.set_color(&dflt)?;
    }
    write!(out, " {:6.2}", d as f32 / 100f32)?;
    if gif.width() == frame.width() && gif.height() == frame.height() {
        out.set_color(&dflt)?;
    } else {
        out.set_color(&bold)?;
    }
    write!(
        out,
        " {:>w$}",
        &format!("{}x{}", frame.width(), frame.height()),
        w = size_digits
    )?;
    if frame.left() == 0 && frame.top() == 0 {
        out.set_color(&dflt)?;
    } else {
        out.set_color(&bold)?;
    }
    writeln!(
        out,
        " {:>w$}",
        &format!("{},{}", frame.left(), frame.top()),
        w = size_digits
    )?;
    Ok(())
}

/// Calculate digits in a number
fn digits<T: Into<usize>>(v: T) -> usize {
    let v = v.into();
    match v {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        1000..=9999 => 4,
        _ => 5,
    }
}

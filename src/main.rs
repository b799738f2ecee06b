// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate mandelmovie;
extern crate num;

use clap::{crate_version, value_t, App, Arg, ArgMatches};
use log::error;
use mandelmovie::{Config, Error, FrameRenderer, JpegEncoder, Scheduler};
use num::Complex;
use std::process;
use std::str::FromStr;

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const FRAMES: &str = "frames";
const PREFIX: &str = "prefix";
const XCENTER: &str = "xcenter";
const YCENTER: &str = "ycenter";
const SCALE: &str = "scale";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const MAX: &str = "max";
const PROCESSES: &str = "processes";
const THREADS: &str = "threads";
const SEMAPHORE: &str = "semaphore";

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("mandelmovie")
        .version(crate_version!())
        .about("Renders a zooming sequence of Mandelbrot images")
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("50")
                .validator(|s| validate_number::<usize>(&s, "Could not parse frame count"))
                .help("Number of frames to generate"),
        )
        .arg(
            Arg::with_name(PREFIX)
                .long(PREFIX)
                .short("p")
                .takes_value(true)
                .default_value("mandel")
                .help("Output file prefix"),
        )
        .arg(
            Arg::with_name(XCENTER)
                .long(XCENTER)
                .short("x")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse X center"))
                .help("X center coordinate of image"),
        )
        .arg(
            Arg::with_name(YCENTER)
                .long(YCENTER)
                .short("y")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse Y center"))
                .help("Y center coordinate of image"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .short("s")
                .takes_value(true)
                .default_value("4")
                .validator(|s| validate_number::<f64>(&s, "Could not parse scale"))
                .help("Scale of the image in Mandelbrot coordinates (X-axis)"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("W")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image width"))
                .help("Image width in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .short("H")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse image height"))
                .help("Image height in pixels"),
        )
        .arg(
            Arg::with_name(MAX)
                .long(MAX)
                .short("m")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(PROCESSES)
                .long(PROCESSES)
                .short("n")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_number::<usize>(&s, "Could not parse frame worker count"))
                .help("Number of frames rendered at once"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_number::<usize>(&s, "Could not parse thread count"))
                .help("Number of threads per frame (1 to 20)"),
        )
        .arg(
            Arg::with_name(SEMAPHORE)
                .long(SEMAPHORE)
                .short("S")
                .help("Admit at most -n frames at a time"),
        )
}

fn config(matches: &ArgMatches) -> Config {
    Config {
        frames: value_t!(matches, FRAMES, usize).unwrap_or_else(|e| e.exit()),
        prefix: matches.value_of(PREFIX).unwrap_or("mandel").to_string(),
        center: Complex::new(
            value_t!(matches, XCENTER, f64).unwrap_or_else(|e| e.exit()),
            value_t!(matches, YCENTER, f64).unwrap_or_else(|e| e.exit()),
        ),
        xscale: value_t!(matches, SCALE, f64).unwrap_or_else(|e| e.exit()),
        width: value_t!(matches, WIDTH, usize).unwrap_or_else(|e| e.exit()),
        height: value_t!(matches, HEIGHT, usize).unwrap_or_else(|e| e.exit()),
        max_iterations: value_t!(matches, MAX, u32).unwrap_or_else(|e| e.exit()),
        processes: value_t!(matches, PROCESSES, usize).unwrap_or_else(|e| e.exit()),
        threads: value_t!(matches, THREADS, usize).unwrap_or_else(|e| e.exit()),
        semaphore: matches.is_present(SEMAPHORE),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config(&app().get_matches());
    let animation = match config.animation() {
        Ok(animation) => animation,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let scheduler = Scheduler::new(FrameRenderer::new(), JpegEncoder::default());
    match scheduler.run(&animation) {
        Err(e @ Error::Configuration(_)) => {
            eprintln!("{}", e);
            process::exit(2);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
        Ok(summary) => {
            if summary.is_success() {
                println!("All {} frames generated successfully.", summary.frames);
            } else {
                for failure in &summary.failed {
                    eprintln!("frame {:03}: {}", failure.index, failure.reason);
                }
                eprintln!(
                    "{} of {} frames generated.",
                    summary.completed.len(),
                    summary.frames
                );
                process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["mandelmovie"];
        argv.extend_from_slice(args);
        config(&app().get_matches_from(argv))
    }

    #[test]
    fn defaults_match_the_library() {
        assert_eq!(parse(&[]), Config::default());
    }

    #[test]
    fn short_flags() {
        let c = parse(&[
            "-f", "5", "-p", "zoom", "-x", "-0.5", "-y", "0.25", "-s", "2", "-W", "320", "-H",
            "240", "-m", "64", "-n", "3", "-t", "4", "-S",
        ]);
        assert_eq!(c.frames, 5);
        assert_eq!(c.prefix, "zoom");
        assert_eq!(c.center, Complex::new(-0.5, 0.25));
        assert_eq!(c.xscale, 2.0);
        assert_eq!((c.width, c.height), (320, 240));
        assert_eq!(c.max_iterations, 64);
        assert_eq!((c.processes, c.threads), (3, 4));
        assert!(c.semaphore);
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let result = app().get_matches_from_safe(vec!["mandelmovie", "-t", "lots"]);
        assert!(result.is_err());
    }
}

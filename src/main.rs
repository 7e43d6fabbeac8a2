//! Command-line REPL for the engine: play, ask for hints, auto-solve,
//! inspect probabilities, and snapshot games to JSON.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use minemind::board::Board;
use minemind::frontier::Frontier;
use minemind::render;
use minemind::rng::GameRng;
use minemind::snapshot;
use minemind::solver::Solver;
use minemind::types::GameState;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Start a game immediately: `minemind new`
    command: Option<String>,
    /// Board width
    #[arg(long, default_value_t = 9)]
    width: usize,
    /// Board height
    #[arg(long, default_value_t = 9)]
    height: usize,
    /// Number of mines
    #[arg(long, default_value_t = 10)]
    mines: usize,
    /// Random seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

struct App {
    board: Option<Board>,
    solver: Solver,
    running: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut app = App {
        board: None,
        solver: Solver::new(),
        running: true,
    };

    if cli.command.as_deref() == Some("new") {
        app.cmd_new(cli.width, cli.height, cli.mines, cli.seed);
    }

    println!("MineMind - type 'help' for commands");
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        app.handle(line.trim());
        if !app.running {
            break;
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

impl App {
    fn handle(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&cmd) = parts.first() else {
            return;
        };

        match cmd {
            "quit" | "exit" => {
                self.running = false;
                println!("goodbye");
            }
            "help" => print_help(),
            "new" => self.parse_new(&parts[1..]),
            "show" => self.cmd_show(parts.contains(&"--reveal")),
            "open" => match parse_coords(&parts[1..]) {
                Some((x, y)) => self.cmd_open(x, y),
                None => println!("usage: open X Y"),
            },
            "flag" => match parse_coords(&parts[1..]) {
                Some((x, y)) => self.cmd_flag(x, y),
                None => println!("usage: flag X Y"),
            },
            "chord" => match parse_coords(&parts[1..]) {
                Some((x, y)) => self.cmd_chord(x, y),
                None => println!("usage: chord X Y"),
            },
            "hint" => self.cmd_hint(),
            "step" => self.cmd_step(),
            "auto" => {
                let allow_guess = parts.contains(&"--guess");
                let limit = parse_flag_value(&parts, "--limit").unwrap_or(1000);
                self.cmd_auto(allow_guess, limit);
            }
            "prob" => self.cmd_prob(),
            "frontier" => self.cmd_frontier(),
            "save" => match parts.get(1) {
                Some(path) => self.cmd_save(path),
                None => println!("usage: save PATH"),
            },
            "load" => match parts.get(1) {
                Some(path) => self.cmd_load(path),
                None => println!("usage: load PATH"),
            },
            _ => println!("unknown command: {cmd}. type 'help' for commands."),
        }
    }

    fn parse_new(&mut self, args: &[&str]) {
        let width = parse_flag_value(args, "--w").unwrap_or(9);
        let height = parse_flag_value(args, "--h").unwrap_or(9);
        let mines = parse_flag_value(args, "--mines").unwrap_or(10);
        let seed = parse_flag_value(args, "--seed");
        self.cmd_new(width, height, mines, seed);
    }

    fn cmd_new(&mut self, width: usize, height: usize, mines: usize, seed: Option<u64>) {
        self.board = Some(Board::new(
            width,
            height,
            mines,
            GameRng::from_seed_opt(seed),
        ));
        self.solver = Solver::new();
        match seed {
            Some(s) => println!("new game: {width}x{height}, {mines} mines, seed={s}"),
            None => println!("new game: {width}x{height}, {mines} mines"),
        }
    }

    fn cmd_show(&self, reveal: bool) {
        let Some(board) = &self.board else {
            println!("no active game, enter 'new' to start");
            return;
        };
        print!("{}", render::render(board, reveal));
        match board.game_state() {
            GameState::Won => println!("\nyou win!"),
            GameState::Lost => println!("\ngame over"),
            GameState::Playing => {}
        }
    }

    fn cmd_open(&mut self, x: usize, y: usize) {
        let Some(board) = &mut self.board else {
            println!("no active game");
            return;
        };
        if board.game_state() != GameState::Playing {
            println!("game is over");
            return;
        }
        let (_, revealed) = board.open(x, y);
        println!("revealed {} cells", revealed.len());
        self.cmd_show(false);
    }

    fn cmd_flag(&mut self, x: usize, y: usize) {
        let Some(board) = &mut self.board else {
            println!("no active game");
            return;
        };
        if board.flag(x, y) {
            println!("flag toggled at ({x}, {y})");
        } else {
            println!("cannot flag ({x}, {y})");
        }
    }

    fn cmd_chord(&mut self, x: usize, y: usize) {
        let Some(board) = &mut self.board else {
            println!("no active game");
            return;
        };
        if board.game_state() != GameState::Playing {
            println!("game is over");
            return;
        }
        let (_, revealed) = board.chord(x, y);
        if revealed.is_empty() {
            println!("chord conditions not met");
        } else {
            println!("chorded, revealed {} cells", revealed.len());
            self.cmd_show(false);
        }
    }

    fn cmd_hint(&mut self) {
        let Some(board) = &self.board else {
            println!("no active game");
            return;
        };
        match self.solver.get_hint(board) {
            Some(hint) => {
                let action = if hint.is_mine { "MINE" } else { "SAFE" };
                let cells: Vec<String> = hint
                    .cells
                    .iter()
                    .map(|(x, y)| format!("({x}, {y})"))
                    .collect();
                println!("{action}: {} - {}", cells.join(", "), hint.explanation);
            }
            None => println!("no certain moves found"),
        }
    }

    fn cmd_step(&mut self) {
        let Some(board) = &mut self.board else {
            println!("no active game");
            return;
        };
        match self.solver.step(board) {
            Some((hint, cells)) => {
                let action = if hint.is_mine { "flagged" } else { "opened" };
                let cell_list: Vec<String> =
                    cells.iter().map(|(x, y)| format!("({x}, {y})")).collect();
                println!("applied {}: {action} {}", hint.rule, cell_list.join(", "));

                for (x, y) in cells {
                    if hint.is_mine {
                        board.flag(x, y);
                    } else {
                        board.open(x, y);
                    }
                }
                self.cmd_show(false);
            }
            None => println!("no certain moves available"),
        }
    }

    fn cmd_auto(&mut self, allow_guess: bool, limit: usize) {
        let Some(board) = &mut self.board else {
            println!("no active game");
            return;
        };
        println!("auto-solving (guess={allow_guess}, limit={limit})...");
        let (_, log) = self.solver.auto_solve(board, allow_guess, limit);
        for line in log.iter().rev().take(10).rev() {
            println!("  {line}");
        }
        self.cmd_show(false);
    }

    fn cmd_prob(&mut self) {
        let Some(board) = &self.board else {
            println!("no active game");
            return;
        };
        let probabilities = self.solver.compute_probabilities(board);
        print!("{}", render::render_probabilities(board, &probabilities));
    }

    fn cmd_frontier(&self) {
        let Some(board) = &self.board else {
            println!("no active game");
            return;
        };
        let frontier = Frontier::new(board);
        let components = frontier.components();
        println!(
            "frontier: {} components, {} unknown cells",
            components.len(),
            frontier.unknowns.len()
        );
        for (i, component) in components.iter().enumerate() {
            println!(
                "  component {}: {} constraints, {} unknowns",
                i + 1,
                component.constraints.len(),
                component.unknowns.len()
            );
        }
    }

    fn cmd_save(&self, path: &str) {
        let Some(board) = &self.board else {
            println!("no active game");
            return;
        };
        match snapshot::save(board, path) {
            Ok(()) => println!("saved to {path}"),
            Err(e) => println!("failed to save: {e}"),
        }
    }

    fn cmd_load(&mut self, path: &str) {
        match snapshot::load(path) {
            Ok(board) => {
                self.board = Some(board);
                self.solver = Solver::new();
                println!("loaded from {path}");
                self.cmd_show(false);
            }
            Err(e) => println!("failed to load: {e}"),
        }
    }
}

fn parse_coords(args: &[&str]) -> Option<(usize, usize)> {
    let x = args.first()?.parse().ok()?;
    let y = args.get(1)?.parse().ok()?;
    Some((x, y))
}

fn parse_flag_value<T: std::str::FromStr>(args: &[&str], flag: &str) -> Option<T> {
    let pos = args.iter().position(|&a| a == flag)?;
    args.get(pos + 1)?.parse().ok()
}

fn print_help() {
    println!(
        "\
commands:
  help                                  list commands
  new [--w W] [--h H] [--mines M] [--seed S]
                                        start a new game
  show [--reveal]                       print board; --reveal shows mines
  open X Y                              reveal cell at (X, Y)
  flag X Y                              toggle flag at (X, Y)
  chord X Y                             on a revealed number: if flags match,
                                        reveal remaining neighbors
  hint                                  print one certain safe/mine move
  step                                  apply one solver step
  auto [--guess] [--limit N]            run solver up to N steps; --guess
                                        allows lowest-risk guesses
  prob                                  ASCII probability heatmap
  frontier                              component summary
  save PATH                             snapshot game state to JSON
  load PATH                             restore snapshot from JSON
  quit | exit                           exit"
    );
}

mod session;

use anyhow::Result;
use clap::Parser;
use ferrite_disk::{DiskConfig, MemDisk};
use ferrite_fs::{Entry, FileSystem, FsError, Mode};
use log::info;
use session::Session;
use std::io::{self, BufRead, Write};

/// Interactive shell for the Ferrite file-layer simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of blocks on the simulated disk
    #[arg(long, default_value_t = 100)]
    blocks: usize,

    /// Bytes per block
    #[arg(long, default_value_t = 10)]
    block_size: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let disk = MemDisk::new(DiskConfig {
        blocks: cli.blocks,
        block_size: cli.block_size,
    });
    let mut fs = FileSystem::new(disk);
    let mut session = Session::new();

    info!(
        "booting with {} blocks of {} bytes",
        cli.blocks, cli.block_size
    );
    println!("Ferrite file system simulator");
    println!("Type 'help' for commands.");
    println!();

    let stdin = io::stdin();
    let mut handle = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{}@{} $ ", session.current().name, fs.pwd());
        io::stdout().flush()?;

        line.clear();
        if handle.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            continue;
        };
        let user = session.current().clone();

        match cmd {
            "exit" => {
                println!("Goodbye.");
                break;
            }
            "help" => print_help(),
            "pwd" => println!("{}", fs.pwd()),
            "ls" => print_listing(&fs),
            "disk" => print_disk(&fs),
            "mkdir" => match args {
                [name] => report(
                    fs.make_directory(name)
                        .map(|_| format!("Directory '{name}' created.")),
                ),
                _ => println!("Usage: mkdir <name>"),
            },
            "touch" => match args {
                [name] => report(
                    fs.make_file(name, &user)
                        .map(|_| format!("File '{name}' created.")),
                ),
                _ => println!("Usage: touch <name>"),
            },
            "cd" => match args {
                [token] => report(fs.change_directory(token).map(|_| String::new())),
                _ => println!("Usage: cd <dir>"),
            },
            "rm" => match args {
                [name] => report(fs.remove(name, &user).map(|_| format!("'{name}' removed."))),
                _ => println!("Usage: rm <name>"),
            },
            "cp" => match args {
                [src, dst] => report(
                    fs.copy(src, dst, &user)
                        .map(|_| format!("'{src}' copied to '{dst}'.")),
                ),
                _ => println!("Usage: cp <src> <dst>"),
            },
            "mv" => match args {
                [src, dst] => report(
                    fs.rename(src, dst)
                        .map(|_| format!("'{src}' moved to '{dst}'.")),
                ),
                _ => println!("Usage: mv <src> <dst>"),
            },
            "cat" => match args {
                [name] => report(
                    fs.read(name, &user)
                        .map(|content| String::from_utf8_lossy(&content).into_owned()),
                ),
                _ => println!("Usage: cat <name>"),
            },
            "write" => match args {
                [name, rest @ ..] if !rest.is_empty() => {
                    let content = rest.join(" ");
                    report(
                        fs.write(name, content.as_bytes(), &user)
                            .map(|_| "Content written.".to_string()),
                    );
                }
                _ => println!("Usage: write <name> <text>"),
            },
            "chmod" => match args {
                [mode_str, name] => match Mode::from_octal(mode_str) {
                    Some(mode) => report(
                        fs.change_mode(name, mode, &user)
                            .map(|_| format!("Mode of '{name}' set to {mode}.")),
                    ),
                    None => println!("Error: mode must be octal digits (e.g. 755)."),
                },
                _ => println!("Usage: chmod <octal> <name>"),
            },
            "su" => match args {
                [name] => {
                    if session.switch(name) {
                        println!("User '{name}' created and selected.");
                    }
                }
                _ => println!("Usage: su <user>"),
            },
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }

    Ok(())
}

fn report(result: std::result::Result<String, FsError>) {
    match result {
        Ok(msg) => {
            if !msg.is_empty() {
                println!("{msg}");
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn print_listing(fs: &FileSystem) {
    println!("Contents of {}:", fs.pwd());
    for entry in fs.list() {
        match entry {
            Entry::Directory { name } => println!("  <DIR>   {name}"),
            Entry::File {
                name,
                mode,
                size,
                id,
            } => println!("  <FILE>  {name}  (mode {mode}, size {size}, id {id})"),
        }
    }
}

fn print_disk(fs: &FileSystem) {
    let disk = fs.disk();
    println!("Free blocks: {}/{}", disk.free_blocks(), disk.total_blocks());
    let map: String = (0..disk.total_blocks().min(50))
        .map(|ix| if disk.is_free(ix) { '.' } else { '#' })
        .collect();
    println!("Map: {map}");
}

fn print_help() {
    println!(
        "
Available commands:
-------------------
Navigation:
  ls                  - List the current directory
  cd <dir>            - Change directory (.. to go up, / for the root)
  pwd                 - Print the current path
  mkdir <name>        - Create a directory

Files:
  touch <name>        - Create an empty file
  rm <name>           - Remove a file or directory
  cp <src> <dst>      - Copy a file
  mv <src> <dst>      - Rename a file or directory
  cat <name>          - Print a file's content
  write <name> <text> - Write text into a file
  chmod <oct> <name>  - Change permissions (e.g. chmod 755 tool)

System:
  su <user>           - Switch user (created on the fly if unknown)
  disk                - Show disk usage and block map
  help                - Show this help
  exit                - Quit
"
    );
}

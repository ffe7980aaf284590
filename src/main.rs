use std::env;
use std::fs;
use std::path::Path;
use std::process;

use bptree::btree::BTree;
use bptree::error::Error;

fn main() {
    let args: Vec<String> = env::args().collect();

    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Error> {
    let command = match args.get(1) {
        Some(c) => c.as_str(),
        None => {
            println!("unknown command");
            return Ok(());
        }
    };

    match command {
        "-c" => create(args),
        "-i" => insert(args),
        "-d" => delete(args),
        "-s" => search(args),
        "-r" => range(args),
        _ => {
            println!("unknown command");
            Ok(())
        }
    }
}

/// `-c index_file B`: create a new tree file, overwriting any existing
/// file at that path.
fn create(args: &[String]) -> Result<(), Error> {
    let index_file = arg(args, 2)?;
    let b: i32 = arg(args, 3)?.parse().map_err(|_| Error::UnexpectedError)?;
    BTree::create(Path::new(index_file), b)?;
    Ok(())
}

/// `-i index_file data_file`: insert every `key,value` line.
fn insert(args: &[String]) -> Result<(), Error> {
    let index_file = arg(args, 2)?;
    let data_file = arg(args, 3)?;
    let tree = BTree::open(Path::new(index_file));

    for line in read_lines(data_file)? {
        let (key, value) = line.split_once(',').ok_or(Error::UnexpectedError)?;
        let key: i32 = key.trim().parse().map_err(|_| Error::UnexpectedError)?;
        let value: i32 = value.trim().parse().map_err(|_| Error::UnexpectedError)?;
        tree.insert(key, value)?;
    }
    Ok(())
}

/// `-d index_file data_file`: delete every key, one per line.
fn delete(args: &[String]) -> Result<(), Error> {
    let index_file = arg(args, 2)?;
    let data_file = arg(args, 3)?;
    let tree = BTree::open(Path::new(index_file));

    for line in read_lines(data_file)? {
        let key: i32 = line.trim().parse().map_err(|_| Error::UnexpectedError)?;
        tree.delete(key)?;
    }
    Ok(())
}

/// `-s index_file key`: point lookup, printing the descent path and
/// either the value or `NOT FOUND`.
fn search(args: &[String]) -> Result<(), Error> {
    let index_file = arg(args, 2)?;
    let key: i32 = arg(args, 3)?.parse().map_err(|_| Error::UnexpectedError)?;
    let tree = BTree::open(Path::new(index_file));
    tree.search(key)
}

/// `-r index_file low high`: range scan, printing one `k, v` per line.
fn range(args: &[String]) -> Result<(), Error> {
    let index_file = arg(args, 2)?;
    let low: i32 = arg(args, 3)?.parse().map_err(|_| Error::UnexpectedError)?;
    let high: i32 = arg(args, 4)?.parse().map_err(|_| Error::UnexpectedError)?;
    let tree = BTree::open(Path::new(index_file));
    tree.range_scan(low, high)
}

fn arg(args: &[String], idx: usize) -> Result<&str, Error> {
    args.get(idx).map(|s| s.as_str()).ok_or(Error::UnexpectedError)
}

fn read_lines(path: &str) -> Result<Vec<String>, Error> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

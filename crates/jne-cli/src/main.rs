use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jne-cli",
    about = "Inspect and edit JSON documents node-by-node via slash pointers",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Pretty-print a document, or a directory of documents as one map
    Show(ShowArgs),
    /// Print the value at a pointer
    Get(PtrArgs),
    /// List the flattened field rows of the node at a pointer
    Fields(PtrArgs),
    /// Print the editable text form of the node at a pointer
    Text(PtrArgs),
    /// Merge edited field text back into the document at a pointer
    Apply(ApplyArgs),
    /// Zip-backup a documents directory
    Backup(BackupArgs),
}

#[derive(ClapArgs, Debug)]
struct ShowArgs {
    /// Document file or directory of .json documents (defaults to .)
    path: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct PtrArgs {
    /// Document file to load
    path: PathBuf,
    /// Slash pointer, e.g. /customer/0/id (empty or / for the root)
    #[arg(long, default_value = "")]
    ptr: String,
}

#[derive(ClapArgs, Debug)]
struct ApplyArgs {
    /// Document file to load
    path: PathBuf,
    /// Slash pointer, e.g. /customer/0/id (empty or / for the root)
    #[arg(long, default_value = "")]
    ptr: String,
    /// Edited field text (a JSON object of leaf fields, or any scalar text)
    #[arg(long)]
    fields: String,
    /// Optional output path to write; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write the result back to the input file
    #[arg(long, default_value_t = false)]
    in_place: bool,
    /// Zip-backup the destination before overwriting it
    #[arg(long, default_value_t = false)]
    backup: bool,
}

#[derive(ClapArgs, Debug)]
struct BackupArgs {
    /// Directory of documents to archive
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Cmd::Show(ShowArgs { path: None })) {
        Cmd::Show(a) => cmd_show(a),
        Cmd::Get(a) => cmd_get(a),
        Cmd::Fields(a) => cmd_fields(a),
        Cmd::Text(a) => cmd_text(a),
        Cmd::Apply(a) => cmd_apply(a),
        Cmd::Backup(a) => cmd_backup(a),
    }
}

fn load_with_pointer(args: &PtrArgs) -> (serde_json::Value, Vec<jne_core::Segment>) {
    let doc = jne_core::load_document(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let path = jne_core::parse_pointer(&args.ptr).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    (doc, path)
}

fn cmd_show(args: ShowArgs) {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let p = path.as_path();
    let res = if p.is_file() {
        jne_core::load_document(p)
    } else if p.is_dir() {
        Ok(jne_core::dir_documents(p))
    } else {
        Err(format!("not found: {}", p.display()))
    };
    match res {
        Ok(v) => match serde_json::to_string_pretty(&v) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        },
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn cmd_get(args: PtrArgs) {
    let (doc, path) = load_with_pointer(&args);
    match jne_core::value_at(&doc, &path) {
        Some(v) => match serde_json::to_string_pretty(v) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        },
        None => {
            eprintln!("not found: {}", jne_core::format_path(&path));
            std::process::exit(3);
        }
    }
}

fn cmd_fields(args: PtrArgs) {
    let (doc, path) = load_with_pointer(&args);
    match jne_core::field_rows_at(&doc, &path) {
        Ok(rows) => {
            println!("{}", jne_core::format_path(&path));
            for r in rows {
                println!(
                    "{}\t{:?}\t{}{}",
                    r.key.as_deref().unwrap_or("-"),
                    r.kind,
                    r.value,
                    r.len.map(|n| format!("\t(len={})", n)).unwrap_or_default()
                );
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(3);
        }
    }
}

fn cmd_text(args: PtrArgs) {
    let (doc, path) = load_with_pointer(&args);
    match jne_core::field_rows_at(&doc, &path) {
        Ok(rows) => {
            let selection = jne_core::NodeSelection { fields: rows, path };
            println!("{}", jne_core::begin_edit(&selection));
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(3);
        }
    }
}

fn cmd_apply(args: ApplyArgs) {
    let text = jne_core::load_document_text(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let path = jne_core::parse_pointer(&args.ptr).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    if args.in_place || args.out.is_some() {
        let dest = args.out.unwrap_or_else(|| args.path.clone());
        let mut store = jne_core::MemoryStore::new(text);
        let mut sink = if args.backup {
            jne_core::FileStore::with_backup(dest)
        } else {
            jne_core::FileStore::new(dest)
        };
        match jne_core::save_edit(&path, &args.fields, &mut store, &mut sink) {
            Ok(()) => println!("saved: {}", sink.path().display()),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(4);
            }
        }
    } else {
        println!("{}", jne_core::merge_update(&text, &path, &args.fields));
    }
}

fn cmd_backup(args: BackupArgs) {
    match jne_core::zip_backup_dir(&args.path) {
        Ok(dest) => println!("backup: {}", dest.display()),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

//! Command-line client for the todo API, built on `todo-sdk`.

use clap::{Parser, Subcommand};
use serde::Serialize;
use todo_sdk::{NewTodo, TodoClient};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the todo API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/api/v1")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List todos
    List {
        /// Filter by status (done, undone)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show a single todo
    Get { id: String },
    /// Create a todo
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        #[arg(short, long)]
        done: bool,
    },
    /// Replace a todo's title, content and status
    Update {
        id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
        #[arg(short, long)]
        done: bool,
    },
    /// Delete a todo
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = TodoClient::new(&cli.url);

    match cli.command {
        Commands::List { status } => print_json(&client.list(status.as_deref()).await?)?,
        Commands::Get { id } => print_json(&client.get(&id).await?)?,
        Commands::Create { title, content, done } => {
            let todo = client.create(&NewTodo::new(title, content, done)).await?;
            print_json(&todo)?;
        }
        Commands::Update { id, title, content, done } => {
            let todo = client.update(&id, &NewTodo::new(title, content, done)).await?;
            print_json(&todo)?;
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

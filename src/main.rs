use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use family_recipes::model::parse_flag;
use family_recipes::{
    build_app_from_env, Action, Page, RecipeApp, SubmissionForm, TextRenderer, UploadedImage,
    ViewState,
};
use log::debug;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(name = "family-recipes")]
#[command(about = "Browse family recipes and submit new ones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipe names
    List,
    /// Show one recipe (the first one if no name is given)
    Show {
        name: Option<String>,
        /// Print the recipe as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a new recipe
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        subtitle: String,
        #[arg(long)]
        calories: String,
        #[arg(long)]
        prep_time: String,
        #[arg(long)]
        cook_time: String,
        #[arg(long, default_value = "")]
        bio: String,
        /// Comma-separated equipment
        #[arg(long, default_value = "")]
        bust_out_list: String,
        /// Comma-separated ingredients
        #[arg(long)]
        ingredients: String,
        /// Comma-separated steps, in order
        #[arg(long)]
        instructions: String,
        #[arg(long)]
        dairy_free: bool,
        #[arg(long)]
        vegetarian: bool,
        /// JPEG or PNG file to embed
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Interactive session (default)
    Browse,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let app = build_app_from_env()?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::List => {
            let dataset = app.dataset().await;
            if let Some(problem) = dataset.problem() {
                eprintln!("{}", problem);
            }
            for name in dataset.unique_names() {
                println!("{}", name);
            }
        }
        Commands::Show { name, json } => {
            let dataset = app.dataset().await;
            if let Some(problem) = dataset.problem() {
                eprintln!("{}", problem);
            }
            if json {
                let recipe = dataset
                    .find_or_first(name.as_deref())
                    .ok_or("No recipes available")?;
                println!("{}", serde_json::to_string_pretty(recipe)?);
            } else {
                let state = match name {
                    Some(name) => ViewState::new().apply(Action::Select(name)),
                    None => ViewState::new(),
                };
                app.show(state, &TextRenderer::stdout()).await;
            }
        }
        Commands::Add {
            name,
            subtitle,
            calories,
            prep_time,
            cook_time,
            bio,
            bust_out_list,
            ingredients,
            instructions,
            dairy_free,
            vegetarian,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            let form = SubmissionForm {
                name,
                subtitle,
                calories,
                prep_time,
                cook_time,
                bio,
                bust_out_list,
                ingredients,
                instructions,
                dairy_free,
                vegetarian,
                image,
            };
            let record = app.submit(&form).await?;
            println!("Recipe '{}' submitted successfully!", record.name);
        }
        Commands::Browse => browse(&app).await?,
    }

    Ok(())
}

async fn read_image(path: &Path) -> Result<UploadedImage, Box<dyn Error>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(UploadedImage {
        file_name: path.display().to_string(),
        bytes,
    })
}

const HELP: &str = "Commands: list | view [name] | fav | favorites | add | help | quit";

async fn browse(app: &RecipeApp) -> Result<(), Box<dyn Error>> {
    let renderer = TextRenderer::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{}", HELP);
    let mut state = app.show(ViewState::new(), &renderer).await;

    while let Some(line) = prompt(&mut lines, "> ").await? {
        let (command, arg) = match line.trim().split_once(' ') {
            Some((command, arg)) => (command.to_string(), arg.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };
        debug!("Command: {} {:?}", command, arg);

        let action = match command.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", HELP);
                continue;
            }
            "list" => Action::Navigate(Page::List),
            "view" if arg.is_empty() => Action::Navigate(Page::Viewer),
            "view" => Action::Select(arg),
            "fav" => Action::ToggleFavorite,
            "favorites" => Action::Navigate(Page::Favorites),
            "add" => {
                state = app
                    .dispatch(state, Action::Navigate(Page::Add), &renderer)
                    .await;
                if let Some(form) = read_form(&mut lines).await? {
                    match app.submit(&form).await {
                        Ok(record) => println!("Recipe '{}' submitted successfully!", record.name),
                        Err(e) => println!("Could not submit recipe: {}", e),
                    }
                }
                continue;
            }
            other => {
                println!("Unknown command '{}'. {}", other, HELP);
                continue;
            }
        };

        state = app.dispatch(state, action, &renderer).await;
    }

    Ok(())
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> Result<Option<String>, Box<dyn Error>> {
    let mut stdout = io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

async fn read_form(
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<SubmissionForm>, Box<dyn Error>> {
    let mut answers = Vec::new();
    for label in [
        "Recipe Name",
        "with Title",
        "Calories",
        "Prep Time (minutes)",
        "Cook Time (minutes)",
        "Recipe Bio",
        "Bust Out List (comma-separated)",
        "Ingredients (comma-separated)",
        "Instructions (comma-separated)",
        "Dairy-Free? (y/n)",
        "Vegetarian? (y/n)",
        "Image file (blank for none)",
    ] {
        match prompt(lines, &format!("{}: ", label)).await? {
            Some(answer) => answers.push(answer.trim().to_string()),
            None => return Ok(None),
        }
    }

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    let mut form = SubmissionForm {
        name: next(),
        subtitle: next(),
        calories: next(),
        prep_time: next(),
        cook_time: next(),
        bio: next(),
        bust_out_list: next(),
        ingredients: next(),
        instructions: next(),
        dairy_free: parse_flag(&next()).unwrap_or(false),
        vegetarian: parse_flag(&next()).unwrap_or(false),
        image: None,
    };

    let image_path = next();
    if !image_path.is_empty() {
        match read_image(&PathBuf::from(&image_path)).await {
            Ok(image) => form.image = Some(image),
            Err(e) => println!("Could not read image '{}': {}", image_path, e),
        }
    }

    Ok(Some(form))
}

/// Dining Admin - Custom Dining administration console
use clap::{Args, Parser, Subcommand};
use dining_admin_cli::commands::{Console, ListKind, ListRequest};
use dining_admin_cli::AdminConfig;
use dining_core::{MealDraft, NewRestaurant};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dining-admin")]
#[command(about = "Custom Dining admin console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account password
        #[arg(short, long, env = "DINING_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Moderate and manage restaurant listings
    Restaurants {
        #[command(subcommand)]
        command: RestaurantCommands,
    },
    /// Manage menu items
    Meals {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Headline counts and recent activity
    Dashboard {
        /// Entries per activity section
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Write an HTML page to this file instead of printing text
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Write one page of a list as an HTML document
    Render {
        /// Which list to render
        #[arg(value_enum)]
        list: ListKind,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
        #[command(flatten)]
        filters: ListArgs,
        /// Restaurant id (meals only)
        #[arg(long)]
        restaurant: Option<String>,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Search text
    #[arg(short, long)]
    search: Option<String>,
}

#[derive(Subcommand)]
enum UserCommands {
    /// List accounts
    List {
        #[command(flatten)]
        filters: ListArgs,
    },
    /// Delete an account
    Delete { id: String },
}

#[derive(Subcommand)]
enum RestaurantCommands {
    /// List restaurants
    List {
        #[command(flatten)]
        filters: ListArgs,
    },
    /// Show one restaurant
    Show {
        id: String,
        /// Print the HTML detail panel
        #[arg(long)]
        html: bool,
    },
    /// Approve a pending listing
    Approve { id: String },
    /// Reject a listing
    Reject {
        id: String,
        /// Reason shown to the owner
        #[arg(short, long)]
        reason: String,
    },
    /// Delete a listing
    Delete { id: String },
    /// Create a listing for an owner account
    Create(CreateRestaurantArgs),
    /// List accounts that can own a restaurant
    Owners,
}

#[derive(Args)]
struct CreateRestaurantArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    email: String,
    /// Owner user id
    #[arg(long)]
    owner: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    opening_hours: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long, default_value_t = 0)]
    capacity: u32,
    #[arg(long)]
    outdoor_seating: bool,
    #[arg(long)]
    parking: bool,
    #[arg(long)]
    vegan: bool,
    #[arg(long)]
    vegetarian: bool,
    #[arg(long)]
    gluten_free: bool,
    #[arg(long)]
    halal: bool,
}

impl From<CreateRestaurantArgs> for NewRestaurant {
    fn from(args: CreateRestaurantArgs) -> Self {
        NewRestaurant {
            name: args.name,
            location: args.location,
            contact_email: args.email,
            contact_number: args.phone,
            website: args.website,
            description: args.description,
            opening_hours: args.opening_hours,
            cuisine_type: args.cuisine,
            capacity: args.capacity,
            has_outdoor_seating: args.outdoor_seating,
            has_parking: args.parking,
            is_vegan_friendly: args.vegan,
            is_vegetarian_friendly: args.vegetarian,
            is_gluten_free_friendly: args.gluten_free,
            is_halal: args.halal,
            user_id: args.owner,
        }
    }
}

#[derive(Subcommand)]
enum MealCommands {
    /// List meals
    List {
        #[command(flatten)]
        filters: ListArgs,
        /// Restaurant id
        #[arg(long)]
        restaurant: Option<String>,
        /// Availability status
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one meal
    Show {
        id: String,
        /// Print the HTML detail panel
        #[arg(long)]
        html: bool,
    },
    /// Create a meal
    Create(MealArgs),
    /// Replace a meal's editable fields
    Update {
        id: String,
        #[command(flatten)]
        meal: MealArgs,
    },
}

#[derive(Args)]
struct MealArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: f64,
    /// Restaurant id
    #[arg(long)]
    restaurant: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    /// Mark the meal unavailable
    #[arg(long)]
    unavailable: bool,
}

impl From<MealArgs> for MealDraft {
    fn from(args: MealArgs) -> Self {
        MealDraft {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            is_available: !args.unavailable,
            restaurant: args.restaurant,
            image_url: args.image_url,
        }
    }
}

fn list_request(args: ListArgs) -> ListRequest {
    ListRequest {
        page: args.page,
        search: args.search,
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dining_admin=info,dining_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AdminConfig::load(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!(base_url = %config.api.base_url, session = ?config.session.path, "Configuration loaded");

    let console = Console::new(config)?;

    let output = match cli.command {
        Commands::Login { email, password } => console.login(&email, &password).await?,
        Commands::Logout => console.logout()?,
        Commands::Whoami => console.whoami()?,
        Commands::Users { command } => match command {
            UserCommands::List { filters } => console.list_users(&list_request(filters)).await?,
            UserCommands::Delete { id } => console.delete_user(&id).await?,
        },
        Commands::Restaurants { command } => match command {
            RestaurantCommands::List { filters } => {
                console.list_restaurants(&list_request(filters)).await?
            }
            RestaurantCommands::Show { id, html } => console.show_restaurant(&id, html).await?,
            RestaurantCommands::Approve { id } => console.approve_restaurant(&id).await?,
            RestaurantCommands::Reject { id, reason } => {
                console.reject_restaurant(&id, &reason).await?
            }
            RestaurantCommands::Delete { id } => console.delete_restaurant(&id).await?,
            RestaurantCommands::Create(args) => {
                console.create_restaurant(&NewRestaurant::from(args)).await?
            }
            RestaurantCommands::Owners => console.restaurant_owners().await?,
        },
        Commands::Meals { command } => match command {
            MealCommands::List {
                filters,
                restaurant,
                status,
            } => {
                let request = ListRequest {
                    restaurant,
                    status,
                    ..list_request(filters)
                };
                console.list_meals(&request).await?
            }
            MealCommands::Show { id, html } => console.show_meal(&id, html).await?,
            MealCommands::Create(args) => console.create_meal(&MealDraft::from(args)).await?,
            MealCommands::Update { id, meal } => {
                console.update_meal(&id, &MealDraft::from(meal)).await?
            }
        },
        Commands::Dashboard { limit, html } => match html {
            Some(path) => {
                let page = console.dashboard_html(limit).await?;
                tokio::fs::write(&path, page).await?;
                format!("Wrote {}", path.display())
            }
            None => console.dashboard(limit).await?,
        },
        Commands::Render {
            list,
            out,
            filters,
            restaurant,
        } => {
            let request = ListRequest {
                restaurant,
                ..list_request(filters)
            };
            let page = console.render(list, &request).await?;
            tokio::fs::write(&out, page).await?;
            format!("Wrote {}", out.display())
        }
    };

    if !output.is_empty() {
        println!("{}", output.trim_end());
    }

    Ok(())
}

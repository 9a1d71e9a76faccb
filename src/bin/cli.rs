//! Kirana Market CLI
//!
//! Terminal front-end for the marketplace API:
//! - Browse stores and catalogs
//! - Register and log in as customer or shopkeeper
//! - Book items, request unlisted items, manage your catalog
//! - Chat with the other side of the counter (live, polled)

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use kirana_market::client::forms::{CustomerSignupForm, ShopSignupForm};
use kirana_market::client::http::{ApiClient, ChatSource, MarketApi};
use kirana_market::client::poller::{ChatPoller, POLL_INTERVAL};
use kirana_market::client::session::{SessionStore, SessionUser};
use kirana_market::client::state::{AppState, Snapshot};
use kirana_market::client::views;
use kirana_market::models::{
    AddProductRequest, BookItemRequest, BookingStatus, ChatKey, DeleteProductRequest, LoginRequest, Participant,
    ParticipantKind, Product, RequestItemRequest, SaveChatRequest, StoreCategory,
    UpdateBookingStatusRequest, UpdateCustomerRequest, UpdateProductRequest, UpdateStoreRequest,
    ALL_STORES,
};

#[derive(Parser)]
#[command(name = "kirana")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local marketplace for customers and shopkeepers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    pub api_url: String,

    /// Session file path (default: platform data dir)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all stores
    Stores,

    /// Show one store's catalog
    Store {
        /// Store id
        id: u64,
    },

    /// Marketplace totals
    Overview,

    /// Register a customer account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Register a shop
    RegisterShop {
        #[arg(long)]
        shop_name: String,
        #[arg(long)]
        owner_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        pincode: String,
        /// grocery, medical, stationery, electronics or general
        #[arg(long)]
        category: StoreCategory,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Log in and persist the session
    Login {
        /// customer or shopkeeper
        role: ParticipantKind,
        phone: String,
        password: String,
    },

    /// Drop the persisted session
    Logout,

    /// Show the logged-in profile
    Profile,

    /// Edit the logged-in profile (only the given fields change)
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        shop_name: Option<String>,
        #[arg(long)]
        owner_name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        pincode: Option<String>,
    },

    /// Book a listed item (customer)
    Book {
        /// Store id
        store_id: u64,
        /// Item name as listed in the catalog
        item: String,
    },

    /// Request an item no store lists (customer)
    RequestItem {
        item: String,
        #[arg(long, default_value = "1")]
        quantity: String,
        #[arg(long)]
        description: Option<String>,
        /// Target store name (default: broadcast to all stores)
        #[arg(long)]
        store: Option<String>,
    },

    /// List bookings relevant to the logged-in user
    Bookings,

    /// List item requests relevant to the logged-in user
    Requests,

    /// Manage your catalog (shopkeeper)
    #[command(subcommand)]
    Products(ProductCommands),

    /// Accept, reject or complete a booking (shopkeeper)
    BookingStatus {
        /// Booking id
        id: u64,
        /// pending, accepted, rejected or completed
        status: BookingStatus,
    },

    /// List your conversations
    Chats,

    /// Open a live conversation, e.g. `kirana chat shopkeeper:1`
    Chat {
        /// The other side, as role:id
        partner: String,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Show your catalog with indexes
    List,
    Add {
        name: String,
        price: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        unavailable: bool,
    },
    /// Replace the product at an index
    Edit {
        index: usize,
        name: String,
        price: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        unavailable: bool,
    },
    /// Remove the product at an index
    Delete { index: usize },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let client = Arc::new(ApiClient::new(&cli.api_url)?);
    let sessions = SessionStore::new(
        cli.session_file
            .clone()
            .unwrap_or_else(SessionStore::default_path),
    );

    match cli.command {
        Commands::Stores => {
            let stores = client.stores().await?;
            print!("{}", views::render_store_list(&stores));
        }

        Commands::Store { id } => {
            let stores = client.stores().await?;
            match stores.iter().find(|s| s.id == id) {
                Some(store) => print!("{}", views::render_store_detail(store)),
                None => println!("No store with id {}", id),
            }
        }

        Commands::Overview => {
            let (stores, customers, bookings) =
                futures::try_join!(client.stores(), client.customers(), client.bookings())?;
            print!(
                "{}",
                views::render_overview(stores.len(), customers.len(), bookings.len())
            );
        }

        Commands::Register {
            name,
            phone,
            email,
            location,
            password,
            confirm_password,
        } => {
            let form = CustomerSignupForm {
                name,
                phone,
                email,
                location,
                password,
                confirm_password,
            };
            let request = form.validate()?;
            client.register_customer(&request).await?;
            println!("Registered. Log in with: kirana login customer {} <password>", request.phone);
        }

        Commands::RegisterShop {
            shop_name,
            owner_name,
            phone,
            email,
            address,
            pincode,
            category,
            password,
            confirm_password,
        } => {
            let form = ShopSignupForm {
                shop_name,
                owner_name,
                phone,
                email,
                address,
                pincode,
                category,
                password,
                confirm_password,
            };
            let request = form.validate()?;
            let shop_id = client.register_shop(&request).await?;
            println!("Shop registered with id {}. Log in with: kirana login shopkeeper {} <password>", shop_id, request.phone);
        }

        Commands::Login {
            role,
            phone,
            password,
        } => {
            let request = LoginRequest { phone, password };
            let session = match role {
                ParticipantKind::Customer => {
                    SessionUser::Customer(client.login_customer(&request).await?)
                }
                ParticipantKind::Shopkeeper => {
                    SessionUser::Shopkeeper(client.login_shopkeeper(&request).await?)
                }
            };
            sessions.save(&session)?;
            println!("Logged in as {} ({})", session.name(), session.role());
        }

        Commands::Logout => {
            sessions.clear()?;
            println!("Logged out.");
        }

        Commands::Profile => {
            let session = require_session(&sessions)?;
            match &session {
                SessionUser::Customer(c) => {
                    println!("{} ({}) - {} | {}", c.name, c.phone, c.email, c.location);
                }
                SessionUser::Shopkeeper(s) => {
                    print!("{}", views::render_store_detail(s));
                }
            }
        }

        Commands::UpdateProfile {
            name,
            email,
            location,
            shop_name,
            owner_name,
            address,
            pincode,
        } => {
            let mut session = require_session(&sessions)?;
            match &session {
                SessionUser::Customer(c) => {
                    let update = UpdateCustomerRequest {
                        id: c.id,
                        name,
                        email,
                        location,
                    };
                    client.update_customer(&update).await?;
                    session.apply_customer_update(&update);
                }
                SessionUser::Shopkeeper(s) => {
                    let update = UpdateStoreRequest {
                        id: s.id,
                        shop_name,
                        owner_name,
                        email,
                        address,
                        pincode,
                    };
                    client.update_store(&update).await?;
                    session.apply_store_update(&update);
                }
            }
            sessions.save(&session)?;
            println!("Profile updated.");
        }

        Commands::Book { store_id, item } => {
            let session = require_session(&sessions)?;
            let customer = session
                .as_customer()
                .ok_or("Only customers can book items")?;

            let stores = client.stores().await?;
            let store = stores
                .iter()
                .find(|s| s.id == store_id)
                .ok_or_else(|| format!("No store with id {}", store_id))?;
            let product = store
                .products
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&item))
                .ok_or_else(|| format!("{} does not list '{}'", store.shop_name, item))?;
            if !product.available {
                return Err(format!("'{}' is out of stock at {}", product.name, store.shop_name).into());
            }

            let booking_id = client
                .book_item(&BookItemRequest {
                    customer_name: customer.name.clone(),
                    customer_phone: customer.phone.clone(),
                    store_name: store.shop_name.clone(),
                    store_phone: store.phone.clone(),
                    item_name: product.name.clone(),
                })
                .await?;
            println!("Booked '{}' at {} (booking #{})", product.name, store.shop_name, booking_id);
        }

        Commands::RequestItem {
            item,
            quantity,
            description,
            store,
        } => {
            let session = require_session(&sessions)?;
            let customer = session
                .as_customer()
                .ok_or("Only customers can request items")?;

            let request_id = client
                .request_item(&RequestItemRequest {
                    item_name: item.clone(),
                    quantity,
                    description,
                    target_store: store.unwrap_or_else(|| ALL_STORES.to_string()),
                    customer_name: customer.name.clone(),
                    customer_phone: customer.phone.clone(),
                    customer_location: customer.location.clone(),
                })
                .await?;
            println!("Request #{} submitted for '{}'", request_id, item);
        }

        Commands::Bookings => {
            let session = require_session(&sessions)?;
            let bookings = client.bookings().await?;
            let mine = match &session {
                SessionUser::Customer(c) => views::bookings_for_customer(&bookings, &c.phone),
                SessionUser::Shopkeeper(s) => views::bookings_for_store(&bookings, &s.phone),
            };
            print!("{}", views::render_bookings(&mine));
        }

        Commands::Requests => {
            let session = require_session(&sessions)?;
            let requests = client.requests().await?;
            let mine = match &session {
                SessionUser::Customer(c) => views::requests_for_customer(&requests, &c.phone),
                SessionUser::Shopkeeper(s) => views::requests_for_store(&requests, &s.shop_name),
            };
            print!("{}", views::render_requests(&mine));
        }

        Commands::Products(command) => {
            let mut session = require_session(&sessions)?;
            let store_id = session
                .as_store()
                .ok_or("Only shopkeepers manage catalogs")?
                .id;

            match command {
                ProductCommands::List => {
                    let store = session.as_store().ok_or("no store in session")?;
                    print!("{}", views::render_products(&store.products));
                }
                ProductCommands::Add {
                    name,
                    price,
                    description,
                    unavailable,
                } => {
                    let product = Product {
                        id: None,
                        name,
                        price,
                        available: !unavailable,
                        description,
                    };
                    client
                        .add_product(&AddProductRequest {
                            store_id,
                            product: product.clone(),
                        })
                        .await?;
                    session.push_product(product);
                    sessions.save(&session)?;
                    println!("Product added.");
                }
                ProductCommands::Edit {
                    index,
                    name,
                    price,
                    description,
                    unavailable,
                } => {
                    let product = Product {
                        id: None,
                        name,
                        price,
                        available: !unavailable,
                        description,
                    };
                    client
                        .update_product(&UpdateProductRequest {
                            store_id,
                            product_index: index,
                            product: product.clone(),
                        })
                        .await?;
                    session.set_product(index, product);
                    sessions.save(&session)?;
                    println!("Product updated.");
                }
                ProductCommands::Delete { index } => {
                    client
                        .delete_product(&DeleteProductRequest {
                            store_id,
                            product_index: index,
                        })
                        .await?;
                    session.remove_product(index);
                    sessions.save(&session)?;
                    println!("Product deleted.");
                }
            }
        }

        Commands::BookingStatus { id, status } => {
            let session = require_session(&sessions)?;
            if session.as_store().is_none() {
                return Err("Only shopkeepers update booking status".into());
            }
            client
                .update_booking_status(&UpdateBookingStatusRequest {
                    booking_id: id,
                    status,
                })
                .await?;
            println!("Booking #{} is now {}", id, status);
        }

        Commands::Chats => {
            let session = require_session(&sessions)?;
            let me = session.participant();
            let chats = client.chats().await?;
            let mine = views::chats_for(&chats, me);
            print!("{}", views::render_chat_list(&mine, me));
        }

        Commands::Chat { partner } => {
            let session = require_session(&sessions)?;
            run_chat(client, &session, &partner).await?;
        }
    }

    Ok(())
}

fn require_session(sessions: &SessionStore) -> Result<SessionUser, Box<dyn Error>> {
    sessions
        .load()?
        .ok_or_else(|| "Not logged in. Run `kirana login` first.".into())
}

fn parse_partner(raw: &str) -> Result<Participant, String> {
    let (role, id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected role:id, got '{}'", raw))?;
    Ok(Participant {
        kind: role.parse()?,
        id: id.parse().map_err(|_| format!("bad id in '{}'", raw))?,
    })
}

/// Interactive chat: the poller refreshes the thread every few seconds in
/// the background; typed lines are sent, `/quit` leaves.
async fn run_chat(
    client: Arc<ApiClient>,
    session: &SessionUser,
    partner: &str,
) -> Result<(), Box<dyn Error>> {
    let me = session.participant();
    let other = parse_partner(partner)?;
    let key = ChatKey::new(me, other)?;

    let state = AppState::new(Snapshot {
        session: Some(session.clone()),
        active_chat: Some(key),
        ..Snapshot::default()
    });
    let poller = ChatPoller::spawn(
        Arc::clone(&client) as Arc<dyn ChatSource>,
        state.clone(),
        POLL_INTERVAL,
    );

    println!("Chatting with {} {} (/quit to leave, empty line to refresh)", other.kind, other.id);
    let mut rendered = 0;
    loop {
        // Surface whatever the poller picked up since the last prompt.
        let conversation = state.snapshot().conversation;
        if conversation.len() > rendered {
            print!("{}", views::render_conversation(&conversation[rendered..], me));
            rendered = conversation.len();
        }

        let (read, line) = tokio::task::spawn_blocking(|| {
            let mut buffer = String::new();
            std::io::stdin().read_line(&mut buffer).map(|n| (n, buffer))
        })
        .await??;

        let text = line.trim();
        if read == 0 || text == "/quit" {
            break;
        }
        if text.is_empty() {
            continue;
        }

        client
            .save_chat(&SaveChatRequest {
                chat_id: key.to_string(),
                sender_id: me.id,
                sender_type: me.kind,
                message: text.to_string(),
            })
            .await?;
    }

    poller.stop().await;
    Ok(())
}

//! Command-line argument parsing for the yap CLI.

use std::env;
use std::process;

use uuid::Uuid;
use yap_core::models::SortOrder;

/// Command-line interface commands
#[derive(Debug)]
pub enum Command {
    Register {
        username: String,
        display_name: String,
        password: String,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    Whoami,
    Post {
        content: String,
        space: String,
    },
    Reply {
        post_id: Uuid,
        content: String,
    },
    React {
        post_id: Uuid,
        emoji: String,
    },
    Edit {
        post_id: Uuid,
        content: String,
    },
    Delete {
        post_id: Uuid,
    },
    Feed {
        space: Option<String>,
        profile: Option<String>,
        sort: SortOrder,
    },
    Search {
        query: String,
    },
    Trending,
    Profile {
        username: String,
    },
    Follow {
        username: String,
        follow: bool,
    },
    SetRole {
        username: String,
        role: String,
    },
    DeleteUser {
        username: String,
    },
    Stats,
    Theme {
        theme: String,
    },
    #[cfg(feature = "suggest-local")]
    Suggest {
        text: String,
    },
    Wipe,
}

fn usage_exit() -> ! {
    print_usage();
    process::exit(1);
}

fn require(args: &[String], index: usize, what: &str) -> String {
    match args.get(index) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: missing {}", what);
            usage_exit();
        }
    }
}

fn require_uuid(args: &[String], index: usize, what: &str) -> Uuid {
    let raw = require(args, index, what);
    match Uuid::parse_str(&raw) {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Error: '{}' is not a valid {}", raw, what);
            process::exit(1);
        }
    }
}

/// Parse command line arguments into a Command
pub fn parse_args() -> Command {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage_exit();
    }

    match args[1].as_str() {
        "register" => Command::Register {
            username: require(&args, 2, "username"),
            display_name: require(&args, 3, "display name"),
            password: require(&args, 4, "password"),
        },
        "login" => Command::Login {
            username: require(&args, 2, "username"),
            password: require(&args, 3, "password"),
        },
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "post" => {
            let content = require(&args, 2, "content");
            let space = match args.iter().position(|a| a == "--space") {
                Some(i) => require(&args, i + 1, "space id"),
                None => "general".to_string(),
            };
            Command::Post { content, space }
        }
        "reply" => Command::Reply {
            post_id: require_uuid(&args, 2, "post id"),
            content: require(&args, 3, "content"),
        },
        "react" => Command::React {
            post_id: require_uuid(&args, 2, "post id"),
            emoji: require(&args, 3, "emoji"),
        },
        "edit" => Command::Edit {
            post_id: require_uuid(&args, 2, "post id"),
            content: require(&args, 3, "content"),
        },
        "delete" => Command::Delete {
            post_id: require_uuid(&args, 2, "post id"),
        },
        "feed" => {
            let space = args
                .iter()
                .position(|a| a == "--space")
                .map(|i| require(&args, i + 1, "space id"));
            let profile = args
                .iter()
                .position(|a| a == "--profile")
                .map(|i| require(&args, i + 1, "username"));
            let sort = match args.iter().position(|a| a == "--sort") {
                Some(i) => match require(&args, i + 1, "sort order").as_str() {
                    "newest" => SortOrder::Newest,
                    "oldest" => SortOrder::Oldest,
                    "popular" => SortOrder::Popular,
                    other => {
                        eprintln!("Error: unknown sort order '{}'", other);
                        eprintln!("Supported orders: newest, oldest, popular");
                        process::exit(1);
                    }
                },
                None => SortOrder::Newest,
            };
            Command::Feed { space, profile, sort }
        }
        "search" => Command::Search {
            query: require(&args, 2, "query"),
        },
        "trending" => Command::Trending,
        "profile" => Command::Profile {
            username: require(&args, 2, "username"),
        },
        "follow" => Command::Follow {
            username: require(&args, 2, "username"),
            follow: true,
        },
        "unfollow" => Command::Follow {
            username: require(&args, 2, "username"),
            follow: false,
        },
        "set-role" => Command::SetRole {
            username: require(&args, 2, "username"),
            role: require(&args, 3, "role"),
        },
        "delete-user" => Command::DeleteUser {
            username: require(&args, 2, "username"),
        },
        "stats" => Command::Stats,
        "theme" => Command::Theme {
            theme: require(&args, 2, "theme"),
        },
        #[cfg(feature = "suggest-local")]
        "suggest" => Command::Suggest {
            text: require(&args, 2, "text"),
        },
        "wipe" => Command::Wipe,
        other => {
            eprintln!("Error: unknown command '{}'", other);
            usage_exit();
        }
    }
}

pub fn print_usage() {
    println!("yap - local-first micro-social feed");
    println!();
    println!("Usage: yap <command> [args]");
    println!();
    println!("Account:");
    println!("  register <username> <display name> <password>");
    println!("  login <username> <password>");
    println!("  logout");
    println!("  whoami");
    println!("  profile <username>");
    println!("  follow <username> | unfollow <username>");
    println!();
    println!("Posting:");
    println!("  post <content> [--space <id>]");
    println!("  reply <post id> <content>");
    println!("  react <post id> <emoji>");
    println!("  edit <post id> <content>");
    println!("  delete <post id>");
    #[cfg(feature = "suggest-local")]
    println!("  suggest <text>");
    println!();
    println!("Reading:");
    println!("  feed [--space <id>] [--profile <username>] [--sort newest|oldest|popular]");
    println!("  search <query>");
    println!("  trending");
    println!();
    println!("Moderation:");
    println!("  set-role <username> <user|moderator|owner>");
    println!("  delete-user <username>");
    println!("  stats");
    println!("  wipe");
    println!();
    println!("Settings:");
    println!("  theme <dark|light>");
}

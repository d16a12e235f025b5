//! Executes parsed commands against the feed engine and prints the results.

use anyhow::{anyhow, Context};
use uuid::Uuid;
use yap_core::models::{Post, Theme, UserRole, ViewState, SPACES};
use yap_engine::FeedEngine;

use crate::args::Command;

pub fn run(cmd: Command, engine: &mut FeedEngine) -> anyhow::Result<()> {
    match cmd {
        Command::Register {
            username,
            display_name,
            password,
        } => {
            let id = engine.register(&username, &display_name, &password)?;
            println!("Welcome to Yap, @{}! (id {})", username.trim().to_lowercase(), id);
        }
        Command::Login { username, password } => {
            engine.login(&username, &password)?;
            let me = engine.me().context("session missing after login")?;
            println!("Signed in as @{}", me.username);
        }
        Command::Logout => {
            engine.logout()?;
            println!("Signed out.");
        }
        Command::Whoami => match engine.me() {
            Some(me) => println!("@{} ({}) — {:?}", me.username, me.display_name, me.role),
            None => println!("Not signed in."),
        },
        Command::Post { content, space } => {
            let id = engine.create_post(&content, &space)?;
            println!("Posted to #{}: {}", space, id);
        }
        Command::Reply { post_id, content } => {
            engine.add_reply(post_id, &content)?;
            println!("Replied to {}", post_id);
        }
        Command::React { post_id, emoji } => {
            engine.toggle_reaction(post_id, &emoji)?;
            let count = engine
                .post(post_id)
                .map(Post::reaction_count)
                .unwrap_or_default();
            println!("Toggled {} on {} ({} total reactions)", emoji, post_id, count);
        }
        Command::Edit { post_id, content } => {
            engine.update_post(post_id, &content)?;
            println!("Updated {}", post_id);
        }
        Command::Delete { post_id } => {
            engine.delete_post(post_id)?;
            println!("Deleted {}", post_id);
        }
        Command::Feed {
            space,
            profile,
            sort,
        } => {
            engine.set_sort(sort);
            if let Some(space) = space {
                engine.set_view(ViewState::Space(space));
            } else if let Some(name) = profile {
                let id = resolve_user(engine, &name)?;
                engine.set_view(ViewState::Profile(id));
            } else {
                engine.set_view(ViewState::Feed);
            }
            let posts: Vec<Post> = engine.visible_posts().into_iter().cloned().collect();
            if posts.is_empty() {
                println!("Nothing here yet.");
            }
            for post in &posts {
                print_post(engine, post);
            }
        }
        Command::Search { query } => {
            let results = engine.search(&query);
            if !results.users.is_empty() {
                println!("People:");
                for user in &results.users {
                    println!("  @{} ({})", user.username, user.display_name);
                }
            }
            if results.posts.is_empty() && results.users.is_empty() {
                println!("No results for \"{}\".", query);
            }
            let posts: Vec<Post> = results.posts.into_iter().cloned().collect();
            for post in &posts {
                print_post(engine, post);
            }
        }
        Command::Trending => {
            let tags = engine.trending_tags();
            if tags.is_empty() {
                println!("No hashtags yet.");
            }
            for (rank, tag) in tags.iter().enumerate() {
                println!("{}. {} ({} yaps)", rank + 1, tag.tag, tag.count);
            }
        }
        Command::Profile { username } => {
            let id = resolve_user(engine, &username)?;
            let user = engine.user(id).context("user vanished mid-command")?;
            let verified = if user.is_verified { " ✔" } else { "" };
            println!("@{}{} — {}", user.username, verified, user.display_name);
            if !user.bio.is_empty() {
                println!("  {}", user.bio);
            }
            println!(
                "  role: {:?} · following: {} · followers: {} · joined {}",
                user.role,
                user.following.len(),
                user.followers.len(),
                user.created_at.format("%Y-%m-%d")
            );
        }
        Command::Follow { username, follow } => {
            let id = resolve_user(engine, &username)?;
            engine.set_follow(id, follow)?;
            let verb = if follow { "Following" } else { "Unfollowed" };
            println!("{} @{}", verb, username);
        }
        Command::SetRole { username, role } => {
            let id = resolve_user(engine, &username)?;
            let role = parse_role(&role)?;
            engine.set_role(id, role)?;
            println!("@{} is now {:?}", username, role);
        }
        Command::DeleteUser { username } => {
            let id = resolve_user(engine, &username)?;
            engine.delete_user(id)?;
            println!("Purged @{} and all their content.", username);
        }
        Command::Stats => {
            let stats = engine.stats();
            println!("users: {}", stats.users);
            println!("posts: {}", stats.posts);
            println!("reactions: {}", stats.reactions);
            println!("replies: {}", stats.replies);
        }
        Command::Theme { theme } => {
            let theme = match theme.as_str() {
                "dark" => Theme::Dark,
                "light" => Theme::Light,
                other => return Err(anyhow!("unknown theme '{}', expected dark or light", other)),
            };
            engine.set_theme(theme)?;
            println!("Theme set to {}.", theme.as_str());
        }
        #[cfg(feature = "suggest-local")]
        Command::Suggest { .. } => unreachable!("handled asynchronously in main"),
        Command::Wipe => {
            engine.wipe()?;
            println!("All slots erased and reseeded.");
        }
    }
    Ok(())
}

fn resolve_user(engine: &FeedEngine, username: &str) -> anyhow::Result<Uuid> {
    engine
        .user_by_name(username)
        .map(|u| u.id)
        .ok_or_else(|| anyhow!("no user named '{}'", username))
}

fn parse_role(raw: &str) -> anyhow::Result<UserRole> {
    match raw {
        "user" => Ok(UserRole::User),
        "moderator" => Ok(UserRole::Moderator),
        "owner" => Ok(UserRole::Owner),
        other => Err(anyhow!(
            "unknown role '{}', expected user, moderator, or owner",
            other
        )),
    }
}

fn print_post(engine: &FeedEngine, post: &Post) {
    let author = engine.author_of(post);
    let space_label = SPACES
        .iter()
        .find(|s| s.id == post.space)
        .map(|s| s.label)
        .unwrap_or("?");
    println!(
        "[{}] @{} · {} · {}",
        post.id,
        author.username,
        space_label,
        post.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!("  {}", post.content);
    if !post.reactions.is_empty() {
        let summary: Vec<String> = post
            .reactions
            .iter()
            .map(|(emoji, who)| format!("{} {}", emoji, who.len()))
            .collect();
        println!("  {}", summary.join("  "));
    }
    for reply in &post.replies {
        println!("  ↳ @{}: {}", reply.username, reply.content);
    }
}

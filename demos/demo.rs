//! Prints your account, status, and rooms.
//!
//! Run with `CHATWORK_API_TOKEN=... cargo run --example demo`.

use chatwork_client::Client;

#[tokio::main]
async fn main() -> Result<(), chatwork_client::Error> {
    let client = Client::from_env()?;

    let me = client.get_me().await?;
    println!("Account: {} ({})", me["name"], me["account_id"]);

    let status = client.get_my_status().await?;
    println!(
        "Unread: {}, mentions: {}, open tasks: {}",
        status["unread_num"], status["mention_num"], status["mytask_num"]
    );

    match client.get_my_tasks().await? {
        Some(tasks) => println!("Tasks: {tasks}"),
        None => println!("No open tasks"),
    }

    let rooms = client.get_rooms().await?;
    for room in rooms.as_array().into_iter().flatten() {
        println!("#{} {}", room["room_id"], room["name"]);
    }

    Ok(())
}

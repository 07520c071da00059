/*
[INPUT]:  Terminal input from the user
[OUTPUT]: Invite codes and CAPTCHA tokens for the auth gates
[POS]:    CLI interactive prompts
[UPDATE]: When gate inputs change
*/

use anyhow::Result;
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use helios_onboard::{InviteReason, InviteStatus, ReferralSummary, SessionState};

pub fn invite_code(reason: InviteReason, referral: Option<&str>) -> Result<String> {
    let message = match reason {
        InviteReason::NotRegistered => "This wallet is not registered yet.",
        InviteReason::NotConfirmed => "This account still needs an invite code.",
        InviteReason::ExternalLink => "Enter an invite code to finish linking your account.",
    };
    println!("{}", style(message).yellow());

    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("Invite code")
        .allow_empty(referral.is_some());
    if let Some(code) = referral {
        input = input.default(code.to_string());
    }
    Ok(input.interact_text()?)
}

pub fn captcha_token() -> Result<String> {
    let theme = ColorfulTheme::default();
    let token = Input::<String>::with_theme(&theme)
        .with_prompt("CAPTCHA token")
        .interact_text()?;
    Ok(token)
}

pub fn print_session(state: &SessionState) {
    println!("{}", style("Session").bold().cyan());
    match &state.user {
        Some(user) => {
            println!("  wallet:   {}", user.wallet);
            if let Some(username) = &user.username {
                println!("  username: {username}");
            }
            if let Some(code) = &user.referral_code {
                println!("  referral: {code}");
            }
        }
        None => println!("  {}", style("not signed in").dim()),
    }
    println!("  step:     {}", state.step);
    println!("  xp:       {}", state.xp);
    if let Some(progress) = &state.onboarding_progress {
        println!("  tasks:    {}", progress.completed_steps.join(", "));
    }
    if state.requires_bot_verification {
        println!("  {}", style("bot verification required").yellow());
    }
}

pub fn print_referrals(status: &InviteStatus, summary: &ReferralSummary) {
    println!("{}", style("Referrals").bold().cyan());
    if let Some(code) = &summary.referral_code {
        println!("  code:      {code}");
    }
    println!("  referred:  {}", summary.referral_count);
    println!("  xp:        {}", summary.referral_xp);
    println!(
        "  invites:   {} of {} left today ({} used)",
        status.remaining_invites, status.current_quota, status.used_today
    );
    if !status.can_invite {
        println!("  {}", style("inviting is currently disabled").yellow());
    }
}

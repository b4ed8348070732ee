//! Localized user-facing replies.
//!
//! English and Chinese catalogs are complete; every other supported
//! language currently falls back to English. Each function is one reply,
//! so the compiler (not a string table) guarantees no key is missing.

use courier_types::error::{UpstreamError, ValidationError};
use courier_types::user::Language;

pub fn welcome(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "欢迎使用 Courier！发送消息即可开始聊天，使用 help 查看全部命令。",
        _ => "Welcome to Courier! Send a message to start chatting, or use help to see all commands.",
    }
}

pub fn help(lang: Language) -> &'static str {
    match lang {
        Language::Zh => {
            "可用命令:\n\
             start - 开始使用\n\
             set-credential - 设置 API 密钥\n\
             reset - 清空当前对话\n\
             params [名称] [值] - 查看或修改参数\n\
             set-language - 选择语言\n\
             help - 显示帮助"
        }
        _ => {
            "Available commands:\n\
             start - get started\n\
             set-credential - set your API key\n\
             reset - clear the current conversation\n\
             params [name] [value] - view or edit parameters\n\
             set-language - pick a language\n\
             help - show this help"
        }
    }
}

pub fn unknown_command(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "无法识别的命令。使用 help 查看可用命令。",
        _ => "Unrecognized command. Use help to see what's available.",
    }
}

pub fn credential_prompt(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "请输入您的 API 密钥:",
        _ => "Please send your API key:",
    }
}

pub fn credential_saved(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "API 密钥设置成功！现在可以开始聊天了。",
        _ => "API key saved. You can start chatting now.",
    }
}

pub fn credential_invalid(lang: Language, err: &ValidationError) -> String {
    match lang {
        Language::Zh => format!("密钥无效 ({err})，请重新输入:"),
        _ => format!("That key was not accepted ({err}). Please send it again:"),
    }
}

pub fn credential_rejected(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "上游服务拒绝了该密钥，请检查后重新输入:",
        _ => "The completion service rejected that key. Please check it and send it again:",
    }
}

pub fn need_credential(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "尚未设置 API 密钥。请先使用 set-credential 命令。",
        _ => "No API key on file yet. Use set-credential first.",
    }
}

pub fn chat_reset(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "聊天历史已清空。",
        _ => "Conversation history cleared.",
    }
}

pub fn params_current(lang: Language, rendered: &str) -> String {
    match lang {
        Language::Zh => format!("当前参数设置:\n{rendered}\n\n{}", params_usage(lang)),
        _ => format!("Current parameters:\n{rendered}\n\n{}", params_usage(lang)),
    }
}

pub fn params_usage(lang: Language) -> &'static str {
    match lang {
        Language::Zh => {
            "params <名称> <值> - 修改参数\n可用参数: model, temperature, max_tokens, top_p, frequency_penalty, presence_penalty"
        }
        _ => {
            "params <name> <value> - edit a parameter\nRecognized: model, temperature, max_tokens, top_p, frequency_penalty, presence_penalty"
        }
    }
}

pub fn params_set(lang: Language, name: &str, value: &str) -> String {
    match lang {
        Language::Zh => format!("参数 {name} 已更新为 {value}"),
        _ => format!("Parameter {name} updated to {value}"),
    }
}

pub fn params_invalid(lang: Language, err: &ValidationError) -> String {
    match lang {
        Language::Zh => format!("参数无效: {err}"),
        _ => format!("Rejected: {err}"),
    }
}

pub fn param_value_prompt(lang: Language, name: &str) -> String {
    match lang {
        Language::Zh => format!("请输入 {name} 的新值:"),
        _ => format!("Send a value for {name}:"),
    }
}

pub fn language_prompt(lang: Language) -> String {
    let codes = Language::ALL
        .iter()
        .map(|l| l.code())
        .collect::<Vec<_>>()
        .join(", ");
    match lang {
        Language::Zh => format!("请选择语言: {codes}"),
        _ => format!("Pick a language: {codes}"),
    }
}

pub fn language_set(lang: Language) -> String {
    match lang {
        Language::Zh => "语言已设置为中文。".to_string(),
        _ => format!("Language set to {}.", lang.code()),
    }
}

pub fn language_invalid(lang: Language) -> String {
    match lang {
        Language::Zh => format!("不支持的语言。{}", language_prompt(lang)),
        _ => format!("That language is not supported. {}", language_prompt(lang)),
    }
}

pub fn upstream_failure(lang: Language, err: &UpstreamError) -> &'static str {
    match (lang, err) {
        (Language::Zh, UpstreamError::Auth) => "API 密钥被上游服务拒绝。请使用 set-credential 重新设置。",
        (Language::Zh, UpstreamError::RateLimited) => "请求过于频繁，请稍后再试。",
        (Language::Zh, UpstreamError::Timeout) => "请求超时，请重试。",
        (Language::Zh, UpstreamError::Other(_)) => "上游服务出错，请稍后再试。",
        (_, UpstreamError::Auth) => {
            "The completion service rejected your API key. Use set-credential to update it."
        }
        (_, UpstreamError::RateLimited) => "Rate limit hit upstream. Try again in a moment.",
        (_, UpstreamError::Timeout) => "The request timed out. Please try again.",
        (_, UpstreamError::Other(_)) => "The completion service had a problem. Try again later.",
    }
}

pub fn storage_failed(lang: Language) -> &'static str {
    match lang {
        Language::Zh => "保存失败，本次操作未生效，请重试。",
        _ => "Could not save that. Nothing was changed -- please try again.",
    }
}

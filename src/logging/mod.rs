use std::{
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{format::DelayedFormat, DateTime, Local, NaiveDate};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

const LOG_DIR: &str = "log";
const FLUSH_THRESHOLD: usize = 2048;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 以背景執行緒寫檔的日誌器，每個等級各自一個檔案
pub struct Logger {
    name: String,
    info_writer: Sender<LogMessage>,
    warn_writer: Sender<LogMessage>,
    error_writer: Sender<LogMessage>,
    debug_writer: Sender<LogMessage>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        Logger {
            name: log_name.to_string(),
            info_writer: Self::create_writer(log_name, log::Level::Info),
            warn_writer: Self::create_writer(log_name, log::Level::Warn),
            error_writer: Self::create_writer(log_name, log::Level::Error),
            debug_writer: Self::create_writer(log_name, log::Level::Debug),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self, log: String) {
        self.send(&self.info_writer, log::Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(&self.warn_writer, log::Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(&self.error_writer, log::Level::Error, log);
    }

    pub fn debug(&self, log: String) {
        self.send(&self.debug_writer, log::Level::Debug, log);
    }

    fn send(&self, writer: &Sender<LogMessage>, level: log::Level, msg: String) {
        if let Err(why) = writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
    }

    fn create_writer(log_name: &str, level: log::Level) -> Sender<LogMessage> {
        let (tx, rx) = unbounded::<LogMessage>();
        let file_name = format!("{}_{}", log_name, level.as_str().to_lowercase());

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || write_to_file(DailyFile::new(file_name), &rx));

        tx
    }

    fn get_log_path(name: &str, date: NaiveDate) -> Option<PathBuf> {
        let path = Path::new(LOG_DIR);

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!("{}_{}.log", date.format("%Y-%m-%d"), name));

        Some(log_path)
    }
}

/// 每天一個檔案，跨日時換到新的檔案
struct DailyFile {
    name: String,
    date: Option<NaiveDate>,
    writer: Option<BufWriter<File>>,
}

impl DailyFile {
    fn new(name: String) -> Self {
        DailyFile {
            name,
            date: None,
            writer: None,
        }
    }

    fn writer(&mut self, date: NaiveDate) -> Option<&mut BufWriter<File>> {
        if self.date != Some(date) || self.writer.is_none() {
            if let Some(mut previous) = self.writer.take() {
                if let Err(why) = previous.flush() {
                    error_console(format!("Failed to flush log file. because:{:#?}", why));
                }
            }

            let log_path = Logger::get_log_path(&self.name, date)?;
            match OpenOptions::new().create(true).append(true).open(&log_path) {
                Ok(file) => {
                    self.writer = Some(BufWriter::new(file));
                    self.date = Some(date);
                }
                Err(why) => {
                    error_console(format!(
                        "Failed to open log file {:?} because {:?}",
                        log_path, why
                    ));
                    return None;
                }
            }
        }

        self.writer.as_mut()
    }
}

fn write_to_file(mut file: DailyFile, rx: &Receiver<LogMessage>) {
    let mut line = String::with_capacity(FLUSH_THRESHOLD);

    for received in rx {
        if writeln!(&mut line, "{}", received.to_line()).is_err() {
            continue;
        }

        if rx.is_empty() || line.len() >= FLUSH_THRESHOLD {
            match file.writer(received.created_at.date_naive()) {
                Some(writer) => {
                    if let Err(why) = writer.write_all(line.as_bytes()) {
                        error_console(format!(
                            "Failed to write to log file. because:{:#?}\r\nmsg:{}",
                            why, line
                        ));
                    }

                    if let Err(why) = writer.flush() {
                        error_console(format!("Failed to flush log file. because:{:#?}", why));
                    }
                }
                None => info_console(line.trim_end().to_string()),
            }

            line.clear();
        }
    }
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{} {} {}",
            self.created_at.format("%F %X%.6f"),
            self.level,
            self.msg
        )
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}

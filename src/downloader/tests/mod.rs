use super::test_helpers::{create_test_downloader, next_matching, wait_for_terminal};
use super::*;
use crate::process::scripted::Script;
use crate::types::{DownloadRequest, JobId, JobStatus};


const VIDEO_URL: &str = "https://www.youtube.com/watch?v=aqz-KE-bpKQ";

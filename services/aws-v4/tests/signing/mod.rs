// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

mod compatibility;
mod concurrency;
mod vectors;

use chrono::{TimeZone, Utc};
use proxysign_aws_v4::{AddressingStyle, Credential, Signer, SignerConfig};
use proxysign_core::time::DateTime;

pub const ACCESS_KEY: &str = "AKIDEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";

/// Initialize test environment
pub fn init_signing_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config matching the published example bucket.
pub fn example_config() -> SignerConfig {
    SignerConfig {
        credential: Credential::new(ACCESS_KEY, SECRET_KEY),
        region: "us-east-1".to_string(),
        service: "s3".to_string(),
        endpoint: "s3.amazonaws.com".to_string(),
        bucket_name: "examplebucket".to_string(),
        addressing: AddressingStyle::VirtualHosted,
        enabled: true,
    }
}

pub fn example_signer() -> Signer {
    Signer::new(example_config())
}

/// 2015-08-30T12:36:00Z
pub fn example_time() -> DateTime {
    Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
}

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

use std::time::SystemTime;

use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest, SigningSettings,
};
use aws_sigv4::sign::v4;
use chrono::{TimeZone, Utc};
use log::debug;
use proxysign_aws_v4::{AddressingStyle, Credential, HostPolicy, Signer, SignerConfig};
use proxysign_core::time::DateTime;
use proxysign_core::RequestContext;
use test_case::test_case;

fn test_signer(addressing: AddressingStyle) -> Signer {
    Signer::new(SignerConfig {
        credential: Credential::new("access_key_id", "secret_access_key"),
        region: "test".to_string(),
        service: "s3".to_string(),
        endpoint: "s3.test.example.com".to_string(),
        bucket_name: "hello".to_string(),
        addressing,
        enabled: true,
    })
}

/// Sign `req` with aws-sigv4 and return the signed request.
fn sign_with_aws_sigv4(
    mut req: http::Request<&'static str>,
    now: DateTime,
) -> Result<http::Request<&'static str>> {
    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Single;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    let id = Credentials::new(
        "access_key_id",
        "secret_access_key",
        None,
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("test")
        .name("s3")
        .time(SystemTime::from(now))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
            SignableBody::UnsignedPayload,
        )
        .unwrap(),
        &sp.into(),
    )?;
    let (aws_sig, _) = output.into_parts();
    aws_sig.apply_to_request_http1x(&mut req);

    Ok(req)
}

#[test_case("http://hello.s3.test.example.com/", AddressingStyle::VirtualHosted; "virtual host root")]
#[test_case("http://hello.s3.test.example.com/hello", AddressingStyle::VirtualHosted; "virtual host object")]
#[test_case("http://hello.s3.test.example.com/hello%20world/a-b_c~d.txt", AddressingStyle::VirtualHosted; "virtual host encoded object")]
#[test_case("http://hello.s3.test.example.com/?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf", AddressingStyle::VirtualHosted; "virtual host list")]
#[test_case("http://s3.test.example.com/hello/hello", AddressingStyle::Path; "path style object")]
#[test_case("http://s3.test.example.com/hello/?list-type=2&prefix=CI/", AddressingStyle::Path; "path style list")]
fn test_compatible_with_aws_sigv4(uri: &'static str, addressing: AddressingStyle) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let expected = sign_with_aws_sigv4(http::Request::get(uri).body("")?, now)?;

    // The proxy sees the path without the bucket when path-style is used.
    let proxied = match addressing {
        AddressingStyle::VirtualHosted => uri.to_string(),
        AddressingStyle::Path => uri.replacen("/hello/", "/", 1),
    };
    let (mut parts, _) = http::Request::get(proxied.as_str()).body(())?.into_parts();
    debug!("signing {} {}", parts.method, parts.uri);

    let signer = test_signer(addressing);
    let headers = signer
        .sign(&RequestContext::from_parts(&parts, now))?
        .expect("signing is enabled");
    headers.merge_into(&mut parts.headers, HostPolicy::Insert);

    for name in ["authorization", "x-amz-date", "x-amz-content-sha256"] {
        assert_eq!(
            parts.headers[name].to_str()?,
            expected.headers()[name].to_str()?,
            "{uri}: {name} mismatch"
        );
    }

    Ok(())
}
